use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A symbolic event, identified by its name. Events are cheap to clone and are compared,
/// ordered and hashed by name alone, so identical names in different generators denote
/// the same event when composed. Whether an event is controllable is not part of its
/// identity; that tagging lives in the [`EventSet`] it belongs to.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Event(Arc<str>);

impl Event {
    /// Creates an event with the given name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Gives the name of the event.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Event {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Event {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Event {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&Event> for Event {
    fn from(ev: &Event) -> Self {
        ev.clone()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named set of events with set algebra and controllability tagging. Events are kept
/// in name order, so iteration and textual dumps are deterministic. Equality is set
/// equality over the contained events; the name of the set and the controllability
/// tagging do not participate in comparisons.
#[derive(Clone, Debug, Default, Eq)]
pub struct EventSet {
    name: String,
    events: BTreeSet<Event>,
    controllable: BTreeSet<Event>,
}

impl PartialEq for EventSet {
    fn eq(&self, other: &Self) -> bool {
        self.events == other.events
    }
}

impl EventSet {
    /// Creates an empty event set with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: BTreeSet::new(),
            controllable: BTreeSet::new(),
        }
    }

    /// Gives the name of the set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the set. Purely cosmetic, the name shows up in dumps and error messages.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Inserts an event into the set and returns it. Idempotent, inserting an event
    /// that is already present is a no-op and keeps its controllability tag.
    pub fn insert(&mut self, event: impl Into<Event>) -> Event {
        let event = event.into();
        self.events.insert(event.clone());
        event
    }

    /// Inserts an event and tags it controllable.
    pub fn insert_controllable(&mut self, event: impl Into<Event>) -> Event {
        let event = self.insert(event);
        self.controllable.insert(event.clone());
        event
    }

    /// Removes an event from the set, dropping its tag as well. Returns whether the
    /// event was present.
    pub fn erase(&mut self, event: &Event) -> bool {
        self.controllable.remove(event);
        self.events.remove(event)
    }

    /// Tests membership. Accepts anything an [`Event`] can be borrowed as, so both
    /// `set.contains(&event)` and `set.contains("alpha")` work.
    pub fn contains<Q>(&self, event: &Q) -> bool
    where
        Event: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.events.contains(event)
    }

    /// Returns whether the given event is tagged controllable in this set. Events that
    /// are not members are reported uncontrollable.
    pub fn is_controllable<Q>(&self, event: &Q) -> bool
    where
        Event: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.controllable.contains(event)
    }

    /// Sets or clears the controllability tag of a member event. Tagging a non-member
    /// has no effect.
    pub fn set_controllable(&mut self, event: &Event, controllable: bool) {
        if !self.events.contains(event) {
            return;
        }
        if controllable {
            self.controllable.insert(event.clone());
        } else {
            self.controllable.remove(event);
        }
    }

    /// Returns the subset of events tagged controllable, tags preserved.
    pub fn controllable_events(&self) -> EventSet {
        Self {
            name: format!("{}_controllable", self.name),
            events: self.controllable.clone(),
            controllable: self.controllable.clone(),
        }
    }

    /// Returns the subset of events not tagged controllable.
    pub fn uncontrollable_events(&self) -> EventSet {
        Self {
            name: format!("{}_uncontrollable", self.name),
            events: self.events.difference(&self.controllable).cloned().collect(),
            controllable: BTreeSet::new(),
        }
    }

    /// Set union. Controllability tags are merged, an event controllable in either
    /// operand is controllable in the result.
    pub fn union(&self, other: &EventSet) -> EventSet {
        Self {
            name: self.name.clone(),
            events: self.events.union(&other.events).cloned().collect(),
            controllable: self
                .controllable
                .union(&other.controllable)
                .cloned()
                .collect(),
        }
    }

    /// Set intersection, tags merged as for [`EventSet::union`] and restricted to the
    /// surviving events.
    pub fn intersection(&self, other: &EventSet) -> EventSet {
        let events: BTreeSet<_> = self.events.intersection(&other.events).cloned().collect();
        let controllable = self
            .controllable
            .union(&other.controllable)
            .filter(|ev| events.contains(*ev))
            .cloned()
            .collect();
        Self {
            name: self.name.clone(),
            events,
            controllable,
        }
    }

    /// Set difference, keeping the tags of the surviving events.
    pub fn difference(&self, other: &EventSet) -> EventSet {
        let events: BTreeSet<_> = self.events.difference(&other.events).cloned().collect();
        let controllable = self
            .controllable
            .iter()
            .filter(|ev| events.contains(*ev))
            .cloned()
            .collect();
        Self {
            name: self.name.clone(),
            events,
            controllable,
        }
    }

    /// Returns whether every event of `self` is contained in `other`.
    pub fn is_subset_of(&self, other: &EventSet) -> bool {
        self.events.is_subset(&other.events)
    }

    /// Iterates the events in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// The number of events in the set.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns whether the set contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<E: Into<Event>> FromIterator<E> for EventSet {
    fn from_iter<T: IntoIterator<Item = E>>(iter: T) -> Self {
        let mut set = EventSet::default();
        for ev in iter {
            set.insert(ev);
        }
        set
    }
}

impl<'a> IntoIterator for &'a EventSet {
    type Item = &'a Event;
    type IntoIter = std::collections::btree_set::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl fmt::Display for EventSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, ev) in self.events.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", ev)?;
            if self.controllable.contains(ev) {
                write!(f, "+C")?;
            }
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_is_idempotent() {
        let mut set = EventSet::new("machine");
        let a = set.insert("alpha");
        let b = set.insert("alpha");
        assert_eq!(a, b);
        assert_eq!(set.len(), 1);
        assert!(set.contains("alpha"));
    }

    #[test]
    fn controllability_tagging() {
        let mut set = EventSet::new("machine");
        set.insert_controllable("alpha");
        set.insert("beta");
        assert!(set.is_controllable("alpha"));
        assert!(!set.is_controllable("beta"));
        assert_eq!(set.controllable_events().len(), 1);
        assert_eq!(set.uncontrollable_events().len(), 1);

        let alpha = Event::new("alpha");
        set.set_controllable(&alpha, false);
        assert!(!set.is_controllable("alpha"));
    }

    #[test]
    fn set_algebra() {
        let left: EventSet = ["a", "b", "c"].into_iter().collect();
        let right: EventSet = ["b", "c", "d"].into_iter().collect();

        let union = left.union(&right);
        assert_eq!(union.len(), 4);
        let inter = left.intersection(&right);
        assert_eq!(
            inter.iter().map(Event::name).collect::<Vec<_>>(),
            vec!["b", "c"]
        );
        let diff = left.difference(&right);
        assert_eq!(diff.iter().map(Event::name).collect::<Vec<_>>(), vec!["a"]);

        assert!(inter.is_subset_of(&left));
        assert!(!left.is_subset_of(&right));
    }

    #[test]
    fn union_merges_tags() {
        let mut left = EventSet::new("l");
        left.insert_controllable("a");
        left.insert("b");
        let mut right = EventSet::new("r");
        right.insert("a");
        right.insert_controllable("b");

        let union = left.union(&right);
        assert!(union.is_controllable("a"));
        assert!(union.is_controllable("b"));
    }

    #[test]
    fn equality_ignores_name_and_tags() {
        let mut left = EventSet::new("l");
        left.insert_controllable("a");
        let mut right = EventSet::new("r");
        right.insert("a");
        assert_eq!(left, right);
    }
}
