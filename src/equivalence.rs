//! Language comparison between generators, used by test-recording and regression
//! tooling. The comparison is invariant to state renaming and to the concrete state
//! indices but sensitive to the recognized language, which is exactly what a
//! recorded-baseline diff needs.

use crate::error::Error;
use crate::generator::{Generator, StateId};
use crate::math::Set;

/// Tests whether two deterministic generators have the same marked language, i.e.
/// accept exactly the same set of words. State names and indices play no role.
pub fn language_equivalent(a: &Generator, b: &Generator) -> Result<bool, Error> {
    check(a, b, |g, q| q.is_some_and(|q| g.exists_marked_state(q)))
}

/// Tests whether two deterministic generators have the same generated (prefix-closed)
/// language, disregarding marking.
pub fn generated_language_equivalent(a: &Generator, b: &Generator) -> Result<bool, Error> {
    check(a, b, |_, q| q.is_some())
}

/// Synchronized exploration of the pair graph over the union alphabet, with `None`
/// standing in for the implicit dead sink. The languages agree iff no reachable pair
/// disagrees under `accept`.
fn check<F>(a: &Generator, b: &Generator, accept: F) -> Result<bool, Error>
where
    F: Fn(&Generator, Option<StateId>) -> bool,
{
    for g in [a, b] {
        if !g.is_deterministic() {
            return Err(Error::NondeterministicInput {
                generator: g.name().to_string(),
            });
        }
    }

    let alphabet = a.alphabet().union(b.alphabet());
    let start = (a.init_state(), b.init_state());
    let mut seen: Set<(Option<StateId>, Option<StateId>)> = Set::default();
    let mut todo = vec![start];
    seen.insert(start);

    while let Some((qa, qb)) = todo.pop() {
        if accept(a, qa) != accept(b, qb) {
            return Ok(false);
        }
        if qa.is_none() && qb.is_none() {
            continue;
        }
        for ev in &alphabet {
            let na = qa.and_then(|q| a.successor(q, ev));
            let nb = qb.and_then(|q| b.successor(q, ev));
            if na.is_none() && nb.is_none() {
                continue;
            }
            if seen.insert((na, nb)) {
                todo.push((na, nb));
            }
        }
    }
    Ok(true)
}
