use std::collections::{BTreeSet, VecDeque};

use bit_set::BitSet;
use tracing::trace;

use crate::generator::{Generator, StateId};
use crate::math::Map;

impl Generator {
    /// The set of states reachable from the initial set, computed by breadth-first
    /// closure over the transition relation.
    pub fn reachable(&self) -> BTreeSet<StateId> {
        self.forward_closure(self.init_states())
    }

    /// The set of states from which a marked state can be reached, computed by
    /// backward closure from the marked set.
    pub fn coreachable(&self) -> BTreeSet<StateId> {
        let mut predecessors: Map<StateId, Vec<StateId>> = Map::default();
        for t in self.transitions() {
            predecessors.entry(t.x2).or_default().push(t.x1);
        }

        let mut seen = BitSet::new();
        let mut queue: VecDeque<StateId> = VecDeque::new();
        let mut result = BTreeSet::new();
        for q in self.marked_states() {
            if seen.insert(q.index()) {
                result.insert(q);
                queue.push_back(q);
            }
        }
        while let Some(q) = queue.pop_front() {
            for &p in predecessors.get(&q).into_iter().flatten() {
                if seen.insert(p.index()) {
                    result.insert(p);
                    queue.push_back(p);
                }
            }
        }
        result
    }

    /// Returns whether some marked state is reachable from the given state.
    pub fn is_marked_reachable(&self, state: StateId) -> bool {
        if !self.contains_state(state) {
            return false;
        }
        self.forward_closure([state])
            .iter()
            .any(|q| self.exists_marked_state(*q))
    }

    /// Returns whether every state is reachable from the initial set.
    pub fn is_accessible(&self) -> bool {
        self.reachable().len() == self.size()
    }

    /// Returns whether every reachable state can reach a marked state, i.e. the
    /// generator has no reachable dead ends.
    pub fn is_nonblocking(&self) -> bool {
        let coreachable = self.coreachable();
        self.reachable().iter().all(|q| coreachable.contains(q))
    }

    /// Returns whether the generator is trim: accessible and coreachable throughout.
    pub fn is_trim(&self) -> bool {
        self.is_accessible() && self.coreachable().len() == self.size()
    }

    /// Deletes all states that are not reachable from the initial set. Returns whether
    /// anything was removed.
    pub fn restrict_reachable(&mut self) -> bool {
        let reachable = self.reachable();
        let doomed: Vec<_> = self.states().filter(|q| !reachable.contains(q)).collect();
        if doomed.is_empty() {
            return false;
        }
        trace!("removing {} unreachable states", doomed.len());
        self.del_states(doomed);
        true
    }

    /// Deletes all states that are unreachable or cannot reach a marked state. Returns
    /// whether anything was removed.
    pub fn trim(&mut self) -> bool {
        let reachable = self.reachable();
        let coreachable = self.coreachable();
        let doomed: Vec<_> = self
            .states()
            .filter(|q| !reachable.contains(q) || !coreachable.contains(q))
            .collect();
        if doomed.is_empty() {
            return false;
        }
        trace!("trim removes {} states", doomed.len());
        self.del_states(doomed);
        true
    }

    fn forward_closure(&self, origin: impl IntoIterator<Item = StateId>) -> BTreeSet<StateId> {
        let mut seen = BitSet::new();
        let mut queue: VecDeque<StateId> = VecDeque::new();
        let mut result = BTreeSet::new();
        for q in origin {
            if seen.insert(q.index()) {
                result.insert(q);
                queue.push_back(q);
            }
        }
        while let Some(q) = queue.pop_front() {
            for (_, p) in self.transitions_from(q) {
                if seen.insert(p.index()) {
                    result.insert(*p);
                    queue.push_back(*p);
                }
            }
        }
        result
    }
}
