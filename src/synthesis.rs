//! Nonblocking supervisory control synthesis in the style of Ramadge and Wonham.
//!
//! The entry point is [`sup_con_nb`]: given a plant, a set of controllable events and
//! a specification over the same alphabet, it computes the generator recognizing the
//! supremal sublanguage of the specification that is controllable with respect to the
//! plant and nonblocking. The algorithm is the classical monotone shrinking fixpoint
//! over the synchronous product of plant and specification: build the product while
//! avoiding states that disable uncontrollable plant events, then alternately trim
//! away blocking states and remove fresh controllability violations until nothing
//! changes.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::error::Error;
use crate::event::{Event, EventSet};
use crate::generator::{Generator, StateId};
use crate::math::{Map, Set};

/// Computes the supremal controllable and nonblocking sublanguage of `spec` with
/// respect to `plant` and the controllable events `calph`.
///
/// Preconditions, checked up front: plant and specification range over the same
/// alphabet (lift the specification with
/// [`inv_project`](crate::operations::inv_project) first), `calph` is contained in
/// that alphabet, and both generators are deterministic.
///
/// If no nonblocking controllable sublanguage containing any marked behaviour exists,
/// the result is the generator with an empty marked language (a single unmarked
/// initial state and no transitions); synthesis itself does not fail in that case.
pub fn sup_con_nb(
    plant: &Generator,
    calph: &EventSet,
    spec: &Generator,
) -> Result<Generator, Error> {
    synthesize(plant, calph, spec, None)
}

/// Like [`sup_con_nb`], but aborts with [`Error::StateSpaceExceeded`] once the product
/// exploration materializes more than `limit` states.
pub fn sup_con_nb_with_limit(
    plant: &Generator,
    calph: &EventSet,
    spec: &Generator,
    limit: usize,
) -> Result<Generator, Error> {
    synthesize(plant, calph, spec, Some(limit))
}

/// Tests whether `candidate` is controllable with respect to `plant` and `calph`:
/// whenever the plant enables an uncontrollable event in a state jointly reachable
/// with a candidate state, the candidate enables it too. Candidate and plant must
/// range over the same alphabet and be deterministic.
pub fn is_controllable(
    plant: &Generator,
    calph: &EventSet,
    candidate: &Generator,
) -> Result<bool, Error> {
    consistency_check(plant, calph, candidate)?;

    let (Some(p0), Some(h0)) = (plant.init_state(), candidate.init_state()) else {
        return Ok(true);
    };
    let mut seen: Set<(StateId, StateId)> = Set::default();
    let mut todo = vec![(p0, h0)];
    seen.insert((p0, h0));
    while let Some((p, h)) = todo.pop() {
        for (ev, pt) in plant.transitions_from(p) {
            match candidate.successor(h, ev) {
                Some(ht) => {
                    if seen.insert((*pt, ht)) {
                        todo.push((*pt, ht));
                    }
                }
                None => {
                    if !calph.contains(ev.name()) {
                        trace!(
                            "candidate state {} disables uncontrollable event {}",
                            candidate.state_label(h),
                            ev
                        );
                        return Ok(false);
                    }
                }
            }
        }
    }
    Ok(true)
}

fn synthesize(
    plant: &Generator,
    calph: &EventSet,
    spec: &Generator,
    limit: Option<usize>,
) -> Result<Generator, Error> {
    consistency_check(plant, calph, spec)?;

    let (mut k, pair_of) = sup_con_product(plant, calph, spec, limit)?;

    // shrink until controllable and trim; the state set strictly decreases, so this
    // terminates
    let mut iteration = 0usize;
    loop {
        iteration += 1;
        let before = k.size();
        k.trim();
        remove_uncontrollable(&mut k, plant, calph, &pair_of);
        debug!(
            "fixpoint iteration {}: {} -> {} states",
            iteration,
            before,
            k.size()
        );
        if k.size() == before || k.is_empty() {
            break;
        }
    }

    if k.is_empty() {
        debug!("no nonblocking controllable sublanguage remains");
        return Ok(empty_language(plant, spec));
    }
    Ok(k)
}

/// The generator with an empty marked language over the plant alphabet: a single
/// unmarked initial state and no transitions.
fn empty_language(plant: &Generator, spec: &Generator) -> Generator {
    let mut out = Generator::new(format!("SupConNB({},{})", plant.name(), spec.name()));
    out.insert_events(plant.alphabet());
    let q = out.new_state();
    out.ins_init_state_by_id(q)
        .expect("freshly created state must exist");
    out
}

/// Builds the synchronous product of plant and specification restricted to pairs
/// reachable from the joint initial state, while skipping the expansion of critical
/// states, i.e. product states in which the specification disables an uncontrollable
/// event the plant enables. Returns the product together with the mapping from result
/// states back to (plant, specification) pairs, which the fixpoint needs for
/// re-checking controllability.
fn sup_con_product(
    plant: &Generator,
    calph: &EventSet,
    spec: &Generator,
    limit: Option<usize>,
) -> Result<(Generator, Map<StateId, (StateId, StateId)>), Error> {
    let mut out = Generator::new(format!("SupConNB({},{})", plant.name(), spec.name()));
    out.insert_events(plant.alphabet());
    for ev in calph {
        out.ins_controllable_event(ev.name());
    }

    let mut map: Map<(StateId, StateId), StateId> = Map::default();
    let mut pair_of: Map<StateId, (StateId, StateId)> = Map::default();
    let mut critical: BTreeSet<StateId> = BTreeSet::new();
    let mut todo: Vec<(StateId, StateId)> = Vec::new();

    let (Some(p0), Some(s0)) = (plant.init_state(), spec.init_state()) else {
        debug!("plant or specification has no initial state, product is empty");
        return Ok((out, pair_of));
    };

    let q0 = pair_state(
        &mut out,
        plant,
        spec,
        &mut map,
        &mut pair_of,
        &mut todo,
        (p0, s0),
        limit,
    )?;
    out.ins_init_state_by_id(q0)
        .expect("freshly created product state must exist");

    while let Some((p, s)) = todo.pop() {
        let source = map[&(p, s)];

        // a state that omits an uncontrollable plant event is critical; it gets no
        // outgoing transitions and is deleted below, the fixpoint loop deals with
        // the consequences for its predecessors
        let spec_enabled: BTreeSet<&Event> = spec.enabled_events(s).collect();
        let violation = plant
            .transitions_from(p)
            .any(|(ev, _)| !calph.contains(ev.name()) && !spec_enabled.contains(ev));
        if violation {
            trace!(
                "product state ({}|{}) is critical",
                plant.state_label(p),
                spec.state_label(s)
            );
            critical.insert(source);
            continue;
        }

        for (ev, pt) in plant.transitions_from(p) {
            if let Some(st) = spec.successor(s, ev) {
                let target = pair_state(
                    &mut out,
                    plant,
                    spec,
                    &mut map,
                    &mut pair_of,
                    &mut todo,
                    (*pt, st),
                    limit,
                )?;
                out.add_edge(source, ev.clone(), target);
            }
        }
    }

    debug!(
        "controllability-aware product has {} states, {} critical",
        out.size(),
        critical.len()
    );
    out.del_states(critical);
    Ok((out, pair_of))
}

#[allow(clippy::too_many_arguments)]
fn pair_state(
    out: &mut Generator,
    plant: &Generator,
    spec: &Generator,
    map: &mut Map<(StateId, StateId), StateId>,
    pair_of: &mut Map<StateId, (StateId, StateId)>,
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
    if let (Some(n1), Some(n2)) = (plant.state_name(pair.0), spec.state_name(pair.1)) {
        out.set_state_name(q, format!("{n1}|{n2}"))
            .expect("freshly created product state must exist");
    }
    if plant.exists_marked_state(pair.0) && spec.exists_marked_state(pair.1) {
        out.set_marked_state_by_id(q)
            .expect("freshly created product state must exist");
    }
    map.insert(pair, q);
    pair_of.insert(q, pair);
    todo.push(pair);
    Ok(q)
}

/// Removes every state of `k` that disables an uncontrollable event the plant enables
/// at the corresponding plant state.
fn remove_uncontrollable(
    k: &mut Generator,
    plant: &Generator,
    calph: &EventSet,
    pair_of: &Map<StateId, (StateId, StateId)>,
) {
    let mut bad = Vec::new();
    for q in k.states() {
        let (p, _) = pair_of[&q];
        let enabled: BTreeSet<&Event> = k.enabled_events(q).collect();
        let violation = plant
            .transitions_from(p)
            .any(|(ev, _)| !calph.contains(ev.name()) && !enabled.contains(ev));
        if violation {
            bad.push(q);
        }
    }
    if !bad.is_empty() {
        trace!("removing {} uncontrollable states", bad.len());
        k.del_states(bad);
    }
}

fn consistency_check(
    plant: &Generator,
    calph: &EventSet,
    spec: &Generator,
) -> Result<(), Error> {
    if plant.alphabet() != spec.alphabet() {
        return Err(Error::AlphabetMismatch {
            only_in_plant: plant.alphabet().difference(spec.alphabet()),
            only_in_spec: spec.alphabet().difference(plant.alphabet()),
        });
    }
    if !calph.is_subset_of(plant.alphabet()) {
        return Err(Error::ControllableEventsNotInAlphabet(
            calph.difference(plant.alphabet()),
        ));
    }
    if !plant.is_deterministic() {
        return Err(Error::NondeterministicInput {
            generator: plant.name().to_string(),
        });
    }
    if !spec.is_deterministic() {
        return Err(Error::NondeterministicInput {
            generator: spec.name().to_string(),
        });
    }
    Ok(())
}
