//! Library for supervisory control of discrete-event systems in Rust.
//!
//! The central data structure is the [`Generator`]: a labelled finite automaton with
//! an event alphabet, a transition relation, initial states and marked (accepting)
//! states, representing a formal language. Generators are built incrementally by name
//! ([`Generator::ins_state`], [`Generator::set_transition`] and friends insert on
//! first use), which keeps tutorial-style model construction free of boilerplate.
//! Events carry a controllability tagging inside their [`EventSet`]: a supervisor may
//! disable controllable events, while uncontrollable events can never be prevented
//! from occurring once the plant enables them.
//!
//! On top of the data structure, the crate provides the three language operators of
//! supervisory control:
//! - [`operations::parallel`] composes two generators into their synchronous product,
//!   where shared events synchronize and private events interleave freely;
//! - [`operations::inv_project`] lifts a generator to a larger alphabet by
//!   self-looping the new events at every state, leaving its language over the
//!   original alphabet untouched;
//! - [`synthesis::sup_con_nb`] computes the supremal controllable and nonblocking
//!   sublanguage of a specification with respect to a plant, the classical
//!   Ramadge-Wonham synthesis step.
//!
//! The usual workflow mirrors that of the operators: compose component models into a
//! plant, lift a specification to the plant alphabet, then synthesize a supervisor
//! and inspect it via [`Generator::transition_table`] or its DOT representation.
//! Generators can be compared for language equivalence with
//! [`equivalence::language_equivalent`], which is invariant to state renaming and
//! hence suitable for recorded-baseline regression tests.
//!
//! All algorithms are single-threaded, exact and enumerative; product constructions
//! can be bounded by a state budget to fail fast instead of exhausting memory on
//! adversarial inputs.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything,
/// i.e. `use supcon::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        equivalence::{generated_language_equivalent, language_equivalent},
        error::Error,
        event::{Event, EventSet},
        generator::{Generator, GeneratorBuilder, StateId, Transition},
        math,
        operations::{self, inv_project, parallel, parallel_with_limit},
        synthesis::{self, is_controllable, sup_con_nb, sup_con_nb_with_limit},
    };
}

/// This module contains some definitions of mathematical objects which are used
/// throughout the crate and do not really fit to the top level.
pub mod math;

/// Events and event sets, the alphabet layer of the crate.
pub mod event;
pub use event::{Event, EventSet};

/// The generator data structure and its queries.
pub mod generator;
pub use generator::{Generator, StateId, Transition};

/// Language operators: parallel composition and inverse projection.
pub mod operations;

/// Supremal controllable sublanguage synthesis.
pub mod synthesis;

/// Language-equivalence comparison between generators.
pub mod equivalence;

/// The error taxonomy of the crate.
pub mod error;
pub use error::Error;
