//! Chaotic worklist fixpoint over the equation store.
//!
//! The solver follows the classic recipe for a monotone system over a
//! finite-height lattice: seed every equation-owning key at `Bot`,
//! re-evaluate keys whose dependencies changed, and stop when nothing
//! moves. Values only ever rise, and the lattice is three levels tall, so
//! termination needs no cycle detection: a cycle simply stabilizes at
//! whatever join is consistent across it.
//!
//! The dependency graph is never walked recursively; a worklist plus a
//! reverse-dependency index (built once per solve) carries all
//! propagation, so deep or cyclic chains cannot exhaust the stack.

use crate::key::KeyId;
use crate::lattice::Value;
use crate::store::EquationStore;
use infera_common::limits::SOLVE_ITERATION_WARN;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// The global fixed point of one store: a total, immutable `KeyId -> Value`
/// mapping.
///
/// `Bot` is a solver-internal placeholder and never appears here: keys the
/// iteration left uninformed are published as `Top` ("assume nothing"), as
/// is any key the store never mentioned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    values: FxHashMap<KeyId, Value>,
}

impl Solution {
    /// The solved value of a key. Unknown keys are `Top`.
    #[inline]
    pub fn get(&self, id: KeyId) -> Value {
        self.values.get(&id).copied().unwrap_or(Value::Top)
    }

    /// Every key the solve touched, with its published value.
    pub fn iter(&self) -> impl Iterator<Item = (KeyId, Value)> + '_ {
        self.values.iter().map(|(&id, &v)| (id, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Solve the store to its least informative-consistent fixed point.
///
/// Deterministic for a given store: joins are commutative and associative
/// and every combinator is monotone, so the iteration order the worklist
/// happens to take cannot change where the system settles.
pub fn solve(store: &EquationStore) -> Solution {
    let mut values: FxHashMap<KeyId, Value> = FxHashMap::default();
    let mut dependents: FxHashMap<KeyId, Vec<KeyId>> = FxHashMap::default();

    // Keys owning equations start at Bot and will be computed. Keys that
    // are referenced but own no equations are unknowable in this store:
    // they hold the safe default from the start and are never re-evaluated.
    for lhs in store.keys() {
        values.insert(lhs, Value::Bot);
    }
    for lhs in store.keys() {
        for expr in store.equations_for(lhs) {
            expr.for_each_key(&mut |dep| {
                dependents.entry(dep).or_default().push(lhs);
                values.entry(dep).or_insert(Value::Top);
            });
        }
    }

    let mut worklist: VecDeque<KeyId> = store.keys().collect();
    let mut queued: FxHashSet<KeyId> = worklist.iter().copied().collect();
    let mut iterations: u64 = 0;

    loop {
        while let Some(id) = worklist.pop_front() {
            queued.remove(&id);
            iterations += 1;
            if iterations == SOLVE_ITERATION_WARN {
                tracing::warn!(iterations, "solve: unusually large equation system");
            }

            let current = values.get(&id).copied().unwrap_or(Value::Bot);

            let mut computed = Value::Bot;
            {
                let lookup = |dep: KeyId| values.get(&dep).copied().unwrap_or(Value::Top);
                for expr in store.equations_for(id) {
                    computed = computed.join(expr.evaluate(&lookup));
                    if computed == Value::Top {
                        break;
                    }
                }
            }

            // Join with the committed value so no update can move down;
            // a key already promoted to Top stays there.
            let next = current.join(computed);
            if next != current {
                values.insert(id, next);
                if let Some(deps) = dependents.get(&id) {
                    for &dependent in deps {
                        if queued.insert(dependent) {
                            worklist.push_back(dependent);
                        }
                    }
                }
            }
        }

        // Keys still at Bot sit on cycles that never produced information.
        // They resolve to the safe default; promoting them can wake their
        // dependents, so feed the promotions back through the worklist.
        let residual: Vec<KeyId> = values
            .iter()
            .filter(|&(_, &v)| v == Value::Bot)
            .map(|(&id, _)| id)
            .collect();
        if residual.is_empty() {
            break;
        }
        for id in residual {
            values.insert(id, Value::Top);
            if let Some(deps) = dependents.get(&id) {
                for &dependent in deps {
                    if queued.insert(dependent) {
                        worklist.push_back(dependent);
                    }
                }
            }
        }
    }

    tracing::debug!(
        keys = values.len(),
        equations = store.equation_count(),
        iterations,
        "solve: fixed point reached"
    );

    Solution { values }
}

#[cfg(test)]
#[path = "solve_tests.rs"]
mod tests;
