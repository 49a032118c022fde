use tracing::debug;

use crate::event::EventSet;
use crate::generator::Generator;

/// Lifts a generator to a larger alphabet in place: every event of `full_alphabet`
/// that is not yet in the generator's alphabet is inserted (controllability tag
/// included) and gets a self-loop at every state. Over its original alphabet the
/// generator's language is unchanged, while the new events are entirely
/// unconstrained; this is how a specification over a subalphabet is made indifferent
/// to the rest of a plant's events before composition or synthesis.
///
/// Events already present are untouched, so handing in a `full_alphabet` that is not
/// a superset simply contributes its new events.
pub fn inv_project(gen: &mut Generator, full_alphabet: &EventSet) {
    let new_events = full_alphabet.difference(gen.alphabet());
    if new_events.is_empty() {
        return;
    }
    debug!(
        "lifting \"{}\" by self-looping {} at every state",
        gen.name(),
        new_events
    );
    gen.insert_events(&new_events);
    let states: Vec<_> = gen.states().collect();
    for q in states {
        for ev in &new_events {
            gen.add_edge(q, ev.clone(), q);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn buffer() -> Generator {
        Generator::builder()
            .named("buffer")
            .with_controllable_events(["alpha_2"])
            .with_transitions([("Empty", "beta_1", "Full"), ("Full", "alpha_2", "Empty")])
            .with_initial("Empty")
            .with_marked(["Empty"])
            .build()
    }

    #[test_log::test]
    fn self_loops_at_every_state() {
        let mut spec = buffer();
        let full: EventSet = ["alpha_1", "alpha_2", "beta_1", "beta_2"].into_iter().collect();
        inv_project(&mut spec, &full);

        assert_eq!(spec.alphabet().len(), 4);
        // two new events, self-looped at both states
        assert_eq!(spec.transitions_len(), 2 + 4);
        for q in spec.states() {
            assert_eq!(spec.successor(q, &Event::new("alpha_1")), Some(q));
            assert_eq!(spec.successor(q, &Event::new("beta_2")), Some(q));
        }
    }

    #[test_log::test]
    fn transparent_over_the_original_alphabet() {
        let mut spec = buffer();
        let full: EventSet = ["alpha_1", "alpha_2", "beta_1", "beta_2"].into_iter().collect();
        inv_project(&mut spec, &full);

        let original = buffer();
        for word in [
            vec![],
            vec!["beta_1"],
            vec!["beta_1", "alpha_2"],
            vec!["beta_1", "beta_1"],
        ] {
            assert_eq!(original.accepts(word.clone()), spec.accepts(word.clone()));
            assert_eq!(original.generates(word.clone()), spec.generates(word));
        }
        // words over only the new events stay in place and are accepted
        assert!(spec.accepts(["alpha_1", "beta_2", "alpha_1"]));
    }

    #[test_log::test]
    fn controllability_tags_are_lifted() {
        let mut spec = buffer();
        let mut full = EventSet::new("plant");
        full.insert_controllable("alpha_1");
        full.insert("beta_1");
        full.insert_controllable("alpha_2");
        full.insert("beta_2");
        inv_project(&mut spec, &full);
        assert!(spec.alphabet().is_controllable("alpha_1"));
        assert!(!spec.alphabet().is_controllable("beta_2"));
    }

    #[test_log::test]
    fn idempotent_on_a_subset() {
        let mut spec = buffer();
        let before = spec.transitions_len();
        let sub: EventSet = ["beta_1"].into_iter().collect();
        inv_project(&mut spec, &sub);
        assert_eq!(spec.transitions_len(), before);
    }
}
