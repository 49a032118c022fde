use tracing::{debug, trace};

use crate::error::Error;
use crate::generator::{Generator, StateId};
use crate::math::Map;

/// Computes the parallel composition (synchronous product) of two generators: events
/// in both alphabets must occur in both operands simultaneously, private events
/// interleave freely. Only product states reachable from the joint initial set are
/// materialized, so the full cross product is never built. The result carries the
/// union alphabet with merged controllability tags; a product state is marked iff both
/// components are marked. Determinism of both inputs implies determinism of the
/// output.
pub fn parallel(g1: &Generator, g2: &Generator) -> Generator {
    compose(g1, g2, None).expect("unbounded composition cannot exceed a state budget")
}

/// Like [`parallel`], but aborts with [`Error::StateSpaceExceeded`] once more than
/// `limit` product states have been materialized.
pub fn parallel_with_limit(
    g1: &Generator,
    g2: &Generator,
    limit: usize,
) -> Result<Generator, Error> {
    compose(g1, g2, Some(limit))
}

fn compose(g1: &Generator, g2: &Generator, limit: Option<usize>) -> Result<Generator, Error> {
    debug!(
        "composing \"{}\" ({} states) with \"{}\" ({} states)",
        g1.name(),
        g1.size(),
        g2.name(),
        g2.size()
    );
    let mut out = Generator::new(format!("Parallel({},{})", g1.name(), g2.name()));
    out.insert_events(&g1.alphabet().union(g2.alphabet()));
    let shared = g1.alphabet().intersection(g2.alphabet());

    let mut map: Map<(StateId, StateId), StateId> = Map::default();
    let mut todo: Vec<(StateId, StateId)> = Vec::new();

    for q1 in g1.init_states() {
        for q2 in g2.init_states() {
            let q = pair_state(&mut out, g1, g2, &mut map, &mut todo, (q1, q2), limit)?;
            out.ins_init_state_by_id(q)
                .expect("freshly created product state must exist");
        }
    }

    while let Some((x1, x2)) = todo.pop() {
        let source = map[&(x1, x2)];
        trace!("expanding product state ({x1}|{x2})");

        for (ev, t1) in g1.transitions_from(x1) {
            if shared.contains(ev.name()) {
                for (ev2, t2) in g2.transitions_from(x2) {
                    if ev2 == ev {
                        let target =
                            pair_state(&mut out, g1, g2, &mut map, &mut todo, (*t1, *t2), limit)?;
                        out.add_edge(source, ev.clone(), target);
                    }
                }
            } else {
                let target = pair_state(&mut out, g1, g2, &mut map, &mut todo, (*t1, x2), limit)?;
                out.add_edge(source, ev.clone(), target);
            }
        }
        for (ev, t2) in g2.transitions_from(x2) {
            if !shared.contains(ev.name()) {
                let target = pair_state(&mut out, g1, g2, &mut map, &mut todo, (x1, *t2), limit)?;
                out.add_edge(source, ev.clone(), target);
            }
        }
    }

    debug!(
        "composition yields {} states and {} transitions",
        out.size(),
        out.transitions_len()
    );
    Ok(out)
}

/// Returns the result state for a pair of component states, creating it (and queueing
/// it for expansion) on first sight. Composed states inherit the `name1|name2` label
/// when both components are named, and are marked iff both components are marked.
fn pair_state(
    out: &mut Generator,
    g1: &Generator,
    g2: &Generator,
    map: &mut Map<(StateId, StateId), StateId>,
    todo: &mut Vec<(StateId, StateId)>,
    pair: (StateId, StateId),
    limit: Option<usize>,
) -> Result<StateId, Error> {
    if let Some(q) = map.get(&pair) {
        return Ok(*q);
    }
    if let Some(limit) = limit {
        if map.len() >= limit {
            return Err(Error::StateSpaceExceeded { limit });
        }
    }
    let q = out.new_state();
    if let (Some(n1), Some(n2)) = (g1.state_name(pair.0), g2.state_name(pair.1)) {
        out.set_state_name(q, format!("{n1}|{n2}"))
            .expect("freshly created product state must exist");
    }
    if g1.exists_marked_state(pair.0) && g2.exists_marked_state(pair.1) {
        out.set_marked_state_by_id(q)
            .expect("freshly created product state must exist");
    }
    map.insert(pair, q);
    todo.push(pair);
    Ok(q)
}

#[cfg(test)]
mod tests {
    use crate::equivalence::language_equivalent;
    use crate::prelude::*;

    fn machine(i: usize) -> Generator {
        Generator::builder()
            .named(format!("machine {i}"))
            .with_controllable_events([format!("alpha_{i}")])
            .with_transitions([
                (format!("Idle{i}"), format!("alpha_{i}"), format!("Busy{i}")),
                (format!("Busy{i}"), format!("beta_{i}"), format!("Idle{i}")),
            ])
            .with_initial(format!("Idle{i}"))
            .with_marked([format!("Idle{i}")])
            .build()
    }

    #[test_log::test]
    fn private_events_interleave() {
        let plant = parallel(&machine(1), &machine(2));
        // no shared events, so the product is the full interleaving
        assert_eq!(plant.size(), 4);
        assert_eq!(plant.transitions_len(), 8);
        assert!(plant.is_deterministic());
        assert_eq!(plant.marked_states().count(), 1);
        assert!(plant.generates(["alpha_1", "alpha_2", "beta_2", "beta_1"]));
        assert!(plant.accepts(["alpha_1", "alpha_2", "beta_2", "beta_1"]));
        assert!(!plant.generates(["beta_1"]));
    }

    #[test_log::test]
    fn shared_events_synchronize() {
        let left = Generator::builder()
            .with_transitions([("0", "a", "1"), ("1", "s", "0")])
            .with_initial("0")
            .with_marked(["0"])
            .build();
        let right = Generator::builder()
            .with_transitions([("0", "b", "1"), ("1", "s", "0")])
            .with_initial("0")
            .with_marked(["0"])
            .build();

        let product = parallel(&left, &right);
        // "s" is shared and only enabled once both components have advanced
        assert!(product.generates(["a", "b", "s"]));
        assert!(product.generates(["b", "a", "s"]));
        assert!(!product.generates(["a", "s"]));
        assert!(!product.generates(["s"]));
        assert!(product.accepts(["a", "b", "s"]));
        assert!(!product.accepts(["a", "b"]));
    }

    #[test_log::test]
    fn commutative_up_to_language_equivalence() {
        let ab = parallel(&machine(1), &machine(2));
        let ba = parallel(&machine(2), &machine(1));
        assert!(language_equivalent(&ab, &ba).unwrap());
    }

    #[test_log::test]
    fn composed_state_names() {
        let plant = parallel(&machine(1), &machine(2));
        let initial = plant.init_state().unwrap();
        assert_eq!(plant.state_label(initial), "Idle1|Idle2");
    }

    #[test_log::test]
    fn unreachable_pairs_are_not_materialized() {
        // the right operand can never leave its initial state, so only pairs with
        // that state show up
        let left = machine(1);
        let right = Generator::builder()
            .with_states(["stuck", "unreachable"])
            .with_initial("stuck")
            .with_marked(["stuck"])
            .build();
        let product = parallel(&left, &right);
        assert_eq!(product.size(), 2);
    }

    #[test_log::test]
    fn state_budget_is_enforced() {
        let plant = parallel(&machine(1), &machine(2));
        assert!(matches!(
            parallel_with_limit(&plant, &machine(3), 3),
            Err(Error::StateSpaceExceeded { limit: 3 })
        ));
        assert!(parallel_with_limit(&plant, &machine(3), 8).is_ok());
    }
}
