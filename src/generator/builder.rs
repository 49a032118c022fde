use crate::generator::Generator;

/// Helper struct for the declarative construction of generators. Events appearing on
/// transitions are inserted into the alphabet automatically; listing them explicitly is
/// only needed to tag controllability or to widen the alphabet beyond the used events.
///
/// # Example
///
/// ```
/// use supcon::prelude::*;
///
/// let machine = Generator::builder()
///     .named("machine 1")
///     .with_controllable_events(["alpha_1"])
///     .with_transitions([
///         ("Idle", "alpha_1", "Busy"),
///         ("Busy", "beta_1", "Idle"),
///     ])
///     .with_initial("Idle")
///     .with_marked(["Idle"])
///     .build();
/// assert_eq!(machine.size(), 2);
/// ```
#[derive(Default)]
pub struct GeneratorBuilder {
    name: Option<String>,
    events: Vec<String>,
    controllable: Vec<String>,
    states: Vec<String>,
    transitions: Vec<(String, String, String)>,
    initial: Vec<String>,
    marked: Vec<String>,
}

impl GeneratorBuilder {
    /// Sets the name of the generator under construction.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Forces the given events into the alphabet, whether or not any transition uses
    /// them.
    pub fn with_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events.extend(events.into_iter().map(Into::into));
        self
    }

    /// Inserts the given events into the alphabet and tags them controllable.
    pub fn with_controllable_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.controllable
            .extend(events.into_iter().map(Into::into));
        self
    }

    /// Forces the given states to exist, whether or not any transition touches them.
    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Adds a list of (source, event, target) transitions.
    pub fn with_transitions<I, S>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: Into<String>,
    {
        self.transitions.extend(
            transitions
                .into_iter()
                .map(|(x1, ev, x2)| (x1.into(), ev.into(), x2.into())),
        );
        self
    }

    /// Declares the initial state.
    pub fn with_initial(mut self, state: impl Into<String>) -> Self {
        self.initial.push(state.into());
        self
    }

    /// Declares marked states.
    pub fn with_marked<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.marked.extend(states.into_iter().map(Into::into));
        self
    }

    /// Builds the generator. States are created in the order in which their names first
    /// appear.
    pub fn build(self) -> Generator {
        let mut gen = Generator::new(self.name.unwrap_or_default());
        for state in &self.states {
            gen.ins_state(state);
        }
        for event in &self.events {
            gen.ins_event(event);
        }
        for event in &self.controllable {
            gen.ins_controllable_event(event);
        }
        for (x1, ev, x2) in &self.transitions {
            gen.set_transition(x1, ev, x2);
        }
        for state in &self.initial {
            gen.ins_init_state(state);
        }
        for state in &self.marked {
            gen.set_marked_state(state);
        }
        gen
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn builder_roundtrip() {
        let gen = Generator::builder()
            .named("buffer")
            .with_controllable_events(["alpha_2"])
            .with_transitions([("Empty", "beta_1", "Full"), ("Full", "alpha_2", "Empty")])
            .with_initial("Empty")
            .with_marked(["Empty"])
            .build();

        assert_eq!(gen.name(), "buffer");
        assert_eq!(gen.size(), 2);
        assert_eq!(gen.transitions_len(), 2);
        assert!(gen.alphabet().is_controllable("alpha_2"));
        assert!(!gen.alphabet().is_controllable("beta_1"));
        assert_eq!(gen.init_state(), gen.state_id("Empty"));
        assert!(gen.exists_marked_state(gen.state_id("Empty").unwrap()));
    }
}
