use crate::event::EventSet;
use crate::generator::StateId;

/// The errors that the engine surfaces to its callers. These are deterministic graph
/// algorithms, so there are no transient failure modes and no internal retries; every
/// error is a precondition violation or a configured resource bound. A failed operation
/// leaves the receiving generator in its last valid state.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// An id-based operation referenced a state that does not exist in the generator.
    /// Name-based operations never produce this, they auto-insert instead.
    #[error("generator \"{generator}\" has no state with index {state}")]
    InvalidReference {
        /// Name of the generator the lookup was performed on.
        generator: String,
        /// The offending state index.
        state: StateId,
    },

    /// Synthesis was invoked on a plant and a specification with different alphabets.
    /// Callers are expected to lift the specification via inverse projection first.
    #[error("alphabets of plant and specification do not match (only in plant: {only_in_plant}, only in specification: {only_in_spec})")]
    AlphabetMismatch {
        /// Events present in the plant alphabet but not in the specification.
        only_in_plant: EventSet,
        /// Events present in the specification alphabet but not in the plant.
        only_in_spec: EventSet,
    },

    /// The set of controllable events handed to synthesis contains events outside
    /// the plant alphabet.
    #[error("controllable events not contained in the plant alphabet: {0}")]
    ControllableEventsNotInAlphabet(EventSet),

    /// Synthesis and language comparison require deterministic input generators.
    #[error("generator \"{generator}\" must be deterministic, but is nondeterministic")]
    NondeterministicInput {
        /// Name of the offending generator.
        generator: String,
    },

    /// A product construction passed the configured bound on the number of product
    /// states. Recoverable by the caller; never a silent truncation.
    #[error("product state space exceeds the configured limit of {limit} states")]
    StateSpaceExceeded {
        /// The configured state budget that was exceeded.
        limit: usize,
    },
}
