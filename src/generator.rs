use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use itertools::Itertools;

use crate::error::Error;
use crate::event::{Event, EventSet};
use crate::math::Bijection;

mod builder;
pub use builder::GeneratorBuilder;

mod reachable;

mod display;

mod dot;

/// Index of a state, scoped to the generator that created it. States have no identity
/// across generators; composing two generators produces fresh indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StateId(u32);

impl StateId {
    /// The raw index, usable as a position in dense bit sets.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered triple (source, event, target). The transition relation of a generator
/// iterates these sorted by source, then event, then target, which keeps every dump
/// and every algorithm deterministic.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Transition {
    /// Source state.
    pub x1: StateId,
    /// The event labelling the transition.
    pub ev: Event,
    /// Target state.
    pub x2: StateId,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}--> {}", self.x1, self.ev, self.x2)
    }
}

/// A labelled finite automaton: a set of states, an event alphabet, a transition
/// relation, a set of initial states and a set of marked (accepting) states.
///
/// Generators are built incrementally. All name-based insertion operations are
/// create-or-return-existing, so the tutorial pattern of referencing states and events
/// by plain identifiers works without preparatory declarations:
///
/// ```
/// use supcon::prelude::*;
///
/// let mut machine = Generator::new("machine");
/// machine.ins_init_state("Idle");
/// machine.set_marked_state("Idle");
/// machine.set_transition("Idle", "alpha", "Busy");
/// machine.set_transition("Busy", "beta", "Idle");
/// assert_eq!(machine.size(), 2);
/// ```
///
/// Nondeterminism is permitted in the data structure; the synthesis and comparison
/// algorithms check determinism up front and refuse nondeterministic input.
#[derive(Clone, Debug, Default)]
pub struct Generator {
    name: String,
    alphabet: EventSet,
    states: BTreeSet<StateId>,
    state_names: Bijection<String, StateId>,
    transitions: BTreeMap<StateId, BTreeSet<(Event, StateId)>>,
    init_states: BTreeSet<StateId>,
    marked_states: BTreeSet<StateId>,
    next_state: u32,
}

impl Generator {
    /// Creates an empty generator with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A builder for constructing generators declaratively, mainly used in tests and
    /// demo code.
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::default()
    }

    /// Gives the name of the generator.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the generator.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Returns whether the generator has no states at all.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterates all state indices in ascending order.
    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states.iter().copied()
    }

    /// Returns whether the given index denotes a state of this generator.
    pub fn contains_state(&self, state: StateId) -> bool {
        self.states.contains(&state)
    }

    /// Inserts a state with the given name, or returns the existing state of that name.
    pub fn ins_state(&mut self, name: impl AsRef<str>) -> StateId {
        let name = name.as_ref();
        if let Some(id) = self.state_names.get_by_left(name) {
            return *id;
        }
        let id = self.new_state();
        self.state_names.insert(name.to_string(), id);
        id
    }

    /// Inserts an anonymous state. Anonymous states are rendered by their index.
    pub fn new_state(&mut self) -> StateId {
        let id = StateId(self.next_state);
        self.next_state += 1;
        self.states.insert(id);
        id
    }

    /// The name of a state, if it has one.
    pub fn state_name(&self, state: StateId) -> Option<&str> {
        self.state_names.get_by_right(&state).map(String::as_str)
    }

    /// Looks up a state by name.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.state_names.get_by_left(name).copied()
    }

    /// A printable label for a state: its name if it has one, its index otherwise.
    pub fn state_label(&self, state: StateId) -> String {
        match self.state_name(state) {
            Some(name) => name.to_string(),
            None => format!("{}", state),
        }
    }

    /// Names an existing state. A name can only refer to one state, naming a second
    /// state with an existing name moves the name over.
    pub fn set_state_name(&mut self, state: StateId, name: impl Into<String>) -> Result<(), Error> {
        if !self.contains_state(state) {
            return Err(self.invalid_reference(state));
        }
        self.state_names.insert(name.into(), state);
        Ok(())
    }

    /// Inserts an event into the alphabet, or returns the existing event of that name.
    pub fn ins_event(&mut self, name: impl AsRef<str>) -> Event {
        self.alphabet.insert(name.as_ref())
    }

    /// Inserts an event into the alphabet and tags it controllable.
    pub fn ins_controllable_event(&mut self, name: impl AsRef<str>) -> Event {
        self.alphabet.insert_controllable(name.as_ref())
    }

    /// Merges all events of the given set into the alphabet, controllability tags
    /// included.
    pub fn insert_events(&mut self, events: &EventSet) {
        self.alphabet = self.alphabet.union(events);
    }

    /// The alphabet of the generator. Every event used by a transition is a member.
    pub fn alphabet(&self) -> &EventSet {
        &self.alphabet
    }

    /// Adds the named state to the initial-state set, inserting it if absent.
    pub fn ins_init_state(&mut self, name: impl AsRef<str>) -> StateId {
        let id = self.ins_state(name);
        self.init_states.insert(id);
        id
    }

    /// Flags the named state as marked, inserting it if absent.
    pub fn set_marked_state(&mut self, name: impl AsRef<str>) -> StateId {
        let id = self.ins_state(name);
        self.marked_states.insert(id);
        id
    }

    /// Strict variant of [`Generator::ins_init_state`] for a state that must already
    /// exist.
    pub fn ins_init_state_by_id(&mut self, state: StateId) -> Result<(), Error> {
        if !self.contains_state(state) {
            return Err(self.invalid_reference(state));
        }
        self.init_states.insert(state);
        Ok(())
    }

    /// Strict variant of [`Generator::set_marked_state`] for a state that must already
    /// exist.
    pub fn set_marked_state_by_id(&mut self, state: StateId) -> Result<(), Error> {
        if !self.contains_state(state) {
            return Err(self.invalid_reference(state));
        }
        self.marked_states.insert(state);
        Ok(())
    }

    /// Iterates the initial states in ascending order.
    pub fn init_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.init_states.iter().copied()
    }

    /// The first initial state, if any. Deterministic generators have at most one.
    pub fn init_state(&self) -> Option<StateId> {
        self.init_states.iter().next().copied()
    }

    /// Iterates the marked states in ascending order.
    pub fn marked_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.marked_states.iter().copied()
    }

    /// Returns whether the given state is initial.
    pub fn exists_init_state(&self, state: StateId) -> bool {
        self.init_states.contains(&state)
    }

    /// Returns whether the given state is marked.
    pub fn exists_marked_state(&self, state: StateId) -> bool {
        self.marked_states.contains(&state)
    }

    /// Sets a transition by name. Lenient: unknown states are inserted and the event is
    /// inserted into the alphabet if absent, which is the behaviour tutorial-style
    /// construction relies on. For strict validation use
    /// [`Generator::set_transition_by_id`].
    pub fn set_transition(
        &mut self,
        src: impl AsRef<str>,
        event: impl AsRef<str>,
        dst: impl AsRef<str>,
    ) {
        let x1 = self.ins_state(src);
        let ev = self.ins_event(event);
        let x2 = self.ins_state(dst);
        self.add_edge(x1, ev, x2);
    }

    /// Sets a transition between existing states. The event is auto-inserted into the
    /// alphabet if absent; unknown state indices are an [`Error::InvalidReference`].
    pub fn set_transition_by_id(
        &mut self,
        src: StateId,
        event: &Event,
        dst: StateId,
    ) -> Result<(), Error> {
        if !self.contains_state(src) {
            return Err(self.invalid_reference(src));
        }
        if !self.contains_state(dst) {
            return Err(self.invalid_reference(dst));
        }
        let ev = self.alphabet.insert(event);
        self.add_edge(src, ev, dst);
        Ok(())
    }

    pub(crate) fn add_edge(&mut self, x1: StateId, ev: Event, x2: StateId) {
        self.transitions.entry(x1).or_default().insert((ev, x2));
    }

    /// Removes a transition. Returns whether it was present.
    pub fn clr_transition(&mut self, src: StateId, event: &Event, dst: StateId) -> bool {
        match self.transitions.get_mut(&src) {
            Some(out) => out.remove(&(event.clone(), dst)),
            None => false,
        }
    }

    /// Iterates the full transition relation sorted by source, event, target.
    pub fn transitions(&self) -> impl Iterator<Item = Transition> + '_ {
        self.transitions.iter().flat_map(|(x1, out)| {
            out.iter().map(|(ev, x2)| Transition {
                x1: *x1,
                ev: ev.clone(),
                x2: *x2,
            })
        })
    }

    /// The number of transitions.
    pub fn transitions_len(&self) -> usize {
        self.transitions.values().map(BTreeSet::len).sum()
    }

    /// Iterates the outgoing transitions of a state as (event, target) pairs, sorted by
    /// event then target. Empty for unknown states.
    pub fn transitions_from(&self, state: StateId) -> impl Iterator<Item = &(Event, StateId)> + '_ {
        self.transitions.get(&state).into_iter().flatten()
    }

    /// Iterates the distinct events enabled at a state, in name order.
    pub fn enabled_events(&self, state: StateId) -> impl Iterator<Item = &Event> + '_ {
        self.transitions_from(state).map(|(ev, _)| ev).dedup()
    }

    /// The successor of a state under an event. For nondeterministic generators this is
    /// the least target; the algorithms that rely on it check determinism beforehand.
    pub fn successor(&self, state: StateId, event: &Event) -> Option<StateId> {
        self.transitions_from(state)
            .find(|(ev, _)| ev == event)
            .map(|(_, x2)| *x2)
    }

    /// Runs the generator on a sequence of event names from its initial state and
    /// returns the state reached, or `None` if the run leaves the transition relation
    /// or there is no initial state.
    pub fn reached_state<W, S>(&self, word: W) -> Option<StateId>
    where
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut current = self.init_state()?;
        for name in word {
            let ev = Event::new(name.as_ref());
            current = self.successor(current, &ev)?;
        }
        Some(current)
    }

    /// Returns whether the given word is in the marked language, i.e. drives the
    /// generator from its initial state to a marked state.
    pub fn accepts<W, S>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reached_state(word)
            .is_some_and(|q| self.exists_marked_state(q))
    }

    /// Returns whether the given word is in the generated (prefix-closed) language.
    pub fn generates<W, S>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reached_state(word).is_some()
    }

    /// Removes a state together with all transitions into and out of it. Returns
    /// whether the state existed.
    pub fn del_state(&mut self, state: StateId) -> bool {
        if !self.states.remove(&state) {
            return false;
        }
        self.state_names.remove_by_right(&state);
        self.init_states.remove(&state);
        self.marked_states.remove(&state);
        self.transitions.remove(&state);
        for out in self.transitions.values_mut() {
            out.retain(|(_, x2)| *x2 != state);
        }
        true
    }

    /// Removes all given states, see [`Generator::del_state`].
    pub fn del_states(&mut self, states: impl IntoIterator<Item = StateId>) {
        let doomed: BTreeSet<_> = states.into_iter().collect();
        if doomed.is_empty() {
            return;
        }
        for state in &doomed {
            self.states.remove(state);
            self.state_names.remove_by_right(state);
            self.init_states.remove(state);
            self.marked_states.remove(state);
            self.transitions.remove(state);
        }
        for out in self.transitions.values_mut() {
            out.retain(|(_, x2)| !doomed.contains(x2));
        }
    }

    /// Returns whether the generator is deterministic: at most one initial state and at
    /// most one outgoing transition per state and event.
    pub fn is_deterministic(&self) -> bool {
        if self.init_states.len() > 1 {
            return false;
        }
        for out in self.transitions.values() {
            // sorted by (event, target), so duplicates sit next to each other
            if out.iter().tuple_windows().any(|(a, b)| a.0 == b.0) {
                return false;
            }
        }
        true
    }

    pub(crate) fn invalid_reference(&self, state: StateId) -> Error {
        Error::InvalidReference {
            generator: self.name.clone(),
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_insertion_is_idempotent() {
        let mut gen = Generator::new("g");
        let a = gen.ins_state("Idle");
        let b = gen.ins_state("Idle");
        assert_eq!(a, b);
        assert_eq!(gen.size(), 1);
        assert_eq!(gen.state_name(a), Some("Idle"));
    }

    #[test]
    fn lenient_transition_auto_inserts() {
        let mut gen = Generator::new("g");
        gen.set_transition("Idle", "alpha", "Busy");
        assert_eq!(gen.size(), 2);
        assert!(gen.alphabet().contains("alpha"));
        assert_eq!(gen.transitions_len(), 1);
    }

    #[test]
    fn strict_transition_rejects_unknown_states() {
        let mut gen = Generator::new("g");
        let q = gen.ins_state("Idle");
        let other = {
            let mut other = Generator::new("other");
            other.ins_state("a");
            other.ins_state("b");
            other.ins_state("stray")
        };
        let alpha = Event::new("alpha");
        assert!(gen.set_transition_by_id(q, &alpha, other).is_err());
        // the failed call must not have touched the generator
        assert_eq!(gen.transitions_len(), 0);
        assert!(!gen.alphabet().contains("alpha"));
    }

    #[test]
    fn del_state_removes_incident_transitions() {
        let mut gen = Generator::new("g");
        gen.set_transition("a", "x", "b");
        gen.set_transition("b", "y", "c");
        gen.set_transition("c", "z", "a");
        let b = gen.state_id("b").unwrap();
        assert!(gen.del_state(b));
        assert_eq!(gen.size(), 2);
        assert_eq!(gen.transitions_len(), 1);
        assert!(gen.state_id("b").is_none());
    }

    #[test]
    fn determinism_detection() {
        let mut gen = Generator::new("g");
        gen.ins_init_state("a");
        gen.set_transition("a", "x", "b");
        assert!(gen.is_deterministic());
        gen.set_transition("a", "x", "c");
        assert!(!gen.is_deterministic());
    }

    #[test]
    fn word_membership() {
        let mut gen = Generator::new("g");
        gen.ins_init_state("Idle");
        gen.set_marked_state("Idle");
        gen.set_transition("Idle", "alpha", "Busy");
        gen.set_transition("Busy", "beta", "Idle");

        assert!(gen.accepts(["alpha", "beta"]));
        assert!(!gen.accepts(["alpha"]));
        assert!(gen.generates(["alpha"]));
        assert!(!gen.generates(["beta"]));
        assert!(gen.accepts(Vec::<&str>::new()));
    }
}
