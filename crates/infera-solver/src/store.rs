//! The equation store: everything the indexing service contributed for one
//! solve epoch.
//!
//! A key may have zero, one, or several contributing equations (overload
//! variants, repeated indexing passes); contributions accumulate and are
//! combined by lattice join at solve time, never overwritten, so duplicate
//! or partial contributions are safe in any order. There is no removal:
//! on invalidation the whole store is rebuilt, which sidesteps a deletion
//! protocol over a graph with arbitrarily many dependents.

use crate::equation::{Equation, EquationError, Expr};
use crate::key::{Condition, Key, KeyId, KeyInterner};
use indexmap::IndexMap;
use infera_common::Atom;
use infera_common::limits::MAX_CONTRACT_PARAMS;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// In-memory multimap from key to its defining equations, plus the member
/// arity table needed downstream for contract rendering.
///
/// Owns the session's [`KeyInterner`]: every key that appears in this
/// store, on either side of an equation, has exactly one `KeyId`.
pub struct EquationStore {
    keys: KeyInterner,
    equations: IndexMap<KeyId, SmallVec<[Expr; 1]>>,
    arities: FxHashMap<Atom, u16>,
}

impl EquationStore {
    pub fn new() -> Self {
        EquationStore {
            keys: KeyInterner::new(),
            equations: IndexMap::new(),
            arities: FxHashMap::default(),
        }
    }

    /// Intern a key into this store's session interner.
    pub fn intern_key(&self, key: Key) -> KeyId {
        self.keys.intern(key)
    }

    /// Look up the key for an interned id.
    pub fn key(&self, id: KeyId) -> Option<Key> {
        self.keys.lookup(id)
    }

    /// Record a member's declared parameter count.
    ///
    /// Different compiled variants must agree; on mismatch the first
    /// declaration wins and the conflict is logged.
    pub fn set_arity(&mut self, member: Atom, arity: u16) {
        match self.arities.get(&member) {
            Some(&existing) if existing != arity => {
                tracing::warn!(
                    member = member.index(),
                    existing,
                    arity,
                    "set_arity: conflicting arity declarations, keeping first"
                );
            }
            Some(_) => {}
            None => {
                self.arities.insert(member, arity);
            }
        }
    }

    /// The declared parameter count of a member, if any contribution
    /// declared one.
    pub fn arity(&self, member: Atom) -> Option<u16> {
        self.arities.get(&member).copied()
    }

    /// Append an equation under its left-hand key.
    ///
    /// Malformed equations are logged and dropped here, before they can
    /// enter the store; the return value reports acceptance so callers can
    /// keep ingestion statistics. A rejected equation never affects other
    /// keys already in the store.
    pub fn add_equation(&mut self, eq: Equation) -> bool {
        if let Err(error) = self.validate(&eq) {
            tracing::warn!(
                key = ?self.keys.lookup(eq.lhs),
                error = %error,
                "add_equation: dropping malformed equation"
            );
            return false;
        }

        self.equations.entry(eq.lhs).or_default().push(eq.rhs);
        true
    }

    fn validate(&self, eq: &Equation) -> Result<(), EquationError> {
        eq.rhs.validate()?;

        if let Some(Key {
            member,
            condition: Condition::ParamIs(index, _),
        }) = self.keys.lookup(eq.lhs)
        {
            if index >= MAX_CONTRACT_PARAMS {
                return Err(EquationError::ParamOutOfRange {
                    index,
                    arity: MAX_CONTRACT_PARAMS,
                });
            }
            if let Some(arity) = self.arity(member) {
                if index >= arity {
                    return Err(EquationError::ParamOutOfRange { index, arity });
                }
            }
        }
        Ok(())
    }

    /// Every equation contributed for a key, in arrival order.
    pub fn equations_for(&self, id: KeyId) -> &[Expr] {
        self.equations.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Keys that own at least one equation, in deterministic insertion
    /// order. Reproducible iteration is what makes re-solving an unchanged
    /// store bit-identical.
    pub fn keys(&self) -> impl Iterator<Item = KeyId> + '_ {
        self.equations.keys().copied()
    }

    /// Number of keys owning at least one equation.
    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    /// Total number of stored equations.
    pub fn equation_count(&self) -> usize {
        self.equations.values().map(|v| v.len()).sum()
    }
}

impl Default for EquationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
