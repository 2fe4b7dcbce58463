//! The equation-source boundary.
//!
//! The indexing service persists equations per compiled artifact and
//! replays them through [`EquationSource::for_each_equation`] once per
//! cache build, in unspecified order. Equations arrive keyed by member
//! *name* (the opaque external-name string); lowering interns those names
//! into the session's key space and hands validated equations to the
//! store.
//!
//! Scoping is a property of the source itself: a source is constructed
//! for one scope, and a scope change surfaces as an engine-level
//! invalidation, not as a parameter here.

use infera_common::ShardedInterner;
use infera_common::limits::MAX_EXPR_DEPTH;
use infera_solver::{Condition, Equation, EquationStore, Expr, Key, Value};
use serde::Serialize;

/// Expression over member names, as the indexing service persists it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum RawExpr {
    Const(Value),
    Ref { member: String, condition: Condition },
    Join(Vec<RawExpr>),
    Meet(Vec<RawExpr>),
    Negate(Box<RawExpr>),
}

/// One persisted equation: the fact slot it defines and its body.
///
/// `arity` is the member's declared parameter count, used to bound
/// conditional keys at ingestion and to pad contract rows at projection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceEquation {
    pub member: String,
    pub arity: u16,
    pub condition: Condition,
    pub rhs: RawExpr,
}

/// A scoped provider of persisted equations.
///
/// Implementations must be callable from whichever single thread triggers
/// a cache build; the engine never calls a source concurrently with
/// itself.
pub trait EquationSource: Send + Sync {
    fn for_each_equation(&self, visitor: &mut dyn FnMut(SourceEquation));
}

/// Lower one source equation into the store.
///
/// Returns whether the equation was accepted. All ingestion failures are
/// logged and local to this equation: the store and the rest of the batch
/// are untouched.
pub(crate) fn ingest(
    store: &mut EquationStore,
    names: &ShardedInterner,
    eq: SourceEquation,
) -> bool {
    // Depth is checked before any recursive walk so a corrupt or hostile
    // payload cannot exhaust the stack during lowering.
    let depth = raw_depth(&eq.rhs);
    if depth > MAX_EXPR_DEPTH {
        tracing::warn!(
            member = %eq.member,
            depth,
            "ingest: dropping equation with excessive nesting"
        );
        discard_raw(eq.rhs);
        return false;
    }

    let member = names.intern(&eq.member);
    store.set_arity(member, eq.arity);
    let lhs = store.intern_key(Key {
        member,
        condition: eq.condition,
    });
    let rhs = lower(&eq.rhs, store, names);
    store.add_equation(Equation::new(lhs, rhs))
}

fn raw_depth(expr: &RawExpr) -> usize {
    let mut max = 0;
    let mut stack: Vec<(&RawExpr, usize)> = vec![(expr, 1)];
    while let Some((expr, depth)) = stack.pop() {
        max = max.max(depth);
        if depth > MAX_EXPR_DEPTH {
            // Deep enough to reject; no need to measure the rest.
            return depth;
        }
        match expr {
            RawExpr::Const(_) | RawExpr::Ref { .. } => {}
            RawExpr::Join(operands) | RawExpr::Meet(operands) => {
                stack.extend(operands.iter().map(|e| (e, depth + 1)));
            }
            RawExpr::Negate(operand) => stack.push((operand, depth + 1)),
        }
    }
    max
}

/// Convert a name-keyed expression into an id-keyed one.
/// Recursion depth is bounded by the `raw_depth` check above.
fn lower(expr: &RawExpr, store: &EquationStore, names: &ShardedInterner) -> Expr {
    match expr {
        RawExpr::Const(v) => Expr::Const(*v),
        RawExpr::Ref { member, condition } => {
            let member = names.intern(member);
            Expr::Key(store.intern_key(Key {
                member,
                condition: *condition,
            }))
        }
        RawExpr::Join(operands) => {
            Expr::Join(operands.iter().map(|e| lower(e, store, names)).collect())
        }
        RawExpr::Meet(operands) => {
            Expr::Meet(operands.iter().map(|e| lower(e, store, names)).collect())
        }
        RawExpr::Negate(operand) => Expr::Negate(Box::new(lower(operand, store, names))),
    }
}

/// Unwind a rejected payload iteratively; the default recursive drop is
/// exactly what a too-deep tree must not hit.
fn discard_raw(expr: RawExpr) {
    let mut stack: Vec<RawExpr> = vec![expr];
    while let Some(expr) = stack.pop() {
        match expr {
            RawExpr::Const(_) | RawExpr::Ref { .. } => {}
            RawExpr::Join(operands) | RawExpr::Meet(operands) => stack.extend(operands),
            RawExpr::Negate(operand) => stack.push(*operand),
        }
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
