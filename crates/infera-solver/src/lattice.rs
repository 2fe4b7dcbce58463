//! The value lattice facts are computed over.
//!
//! A flat join-semilattice: `Bot` below everything, `Top` above
//! everything, and a finite band of mutually incomparable informative
//! elements in between. Height 3 is what bounds the fixpoint iteration in
//! [`crate::solve`]: a key's value can rise at most twice.

use serde::Serialize;

/// One element of the fact lattice.
///
/// The informative elements are the facts the engine can actually state
/// about a member: return nullity, a forced boolean result, a guaranteed
/// throw, or purity. `Bot` is the solver-internal "not computed yet"
/// placeholder and never escapes a published solution; `Top` is "no fact
/// holds" and is the safe default for anything unknown or contradictory.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Value {
    /// No information yet / unreachable. Solver-internal.
    Bot,
    /// The result is never null.
    NotNull,
    /// The result is always null.
    Null,
    /// The result is the boolean `true`.
    True,
    /// The result is the boolean `false`.
    False,
    /// The member completes abruptly (throws).
    Fail,
    /// The member has no observable side effects.
    Pure,
    /// No fact holds; assume nothing.
    Top,
}

impl Value {
    /// Every lattice element, for exhaustive law checks.
    pub const ALL: [Value; 8] = [
        Value::Bot,
        Value::NotNull,
        Value::Null,
        Value::True,
        Value::False,
        Value::Fail,
        Value::Pure,
        Value::Top,
    ];

    /// Whether this element carries a publishable fact.
    #[inline]
    pub fn is_informative(self) -> bool {
        !matches!(self, Value::Bot | Value::Top)
    }

    /// Least upper bound of two elements.
    ///
    /// Distinct informative elements have no common fact, so their join is
    /// `Top`. Commutative, associative, idempotent, and monotone; `Bot` is
    /// the identity and `Top` absorbs.
    #[inline]
    pub fn join(self, other: Value) -> Value {
        match (self, other) {
            (Value::Bot, v) | (v, Value::Bot) => v,
            (Value::Top, _) | (_, Value::Top) => Value::Top,
            (a, b) if a == b => a,
            _ => Value::Top,
        }
    }

    /// Flip boolean polarity; every non-boolean element is fixed.
    #[inline]
    pub fn negate(self) -> Value {
        match self {
            Value::True => Value::False,
            Value::False => Value::True,
            v => v,
        }
    }

    /// The flat partial order: `Bot <= v <= Top` for every `v`, informative
    /// elements only comparable to themselves.
    #[inline]
    pub fn le(self, other: Value) -> bool {
        self == Value::Bot || other == Value::Top || self == other
    }
}

#[cfg(test)]
#[path = "lattice_tests.rs"]
mod tests;
