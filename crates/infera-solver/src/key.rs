//! Keys: one fact-under-condition about one member.
//!
//! A [`Key`] names a single slot of the equation system: "what is known
//! about member M when condition C is observed". Keys are interned into
//! lightweight [`KeyId`] handles so the solver works with u32 arrays
//! instead of heap structures.
//!
//! Benefits:
//! - O(1) key equality (just compare KeyId values)
//! - One instance per logical key within a solving session
//! - Dependency edges are plain integers

use infera_common::Atom;
use rustc_hash::{FxHashMap, FxHasher};
use serde::Serialize;
use std::hash::{Hash, Hasher};
use std::sync::RwLock;

/// Observed nullity of a parameter in a conditional key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Nullity {
    Null,
    NotNull,
}

/// The input condition a key is predicated on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Condition {
    /// Holds on every call.
    Always,
    /// Holds when the given parameter is observed null / not-null.
    ParamIs(u16, Nullity),
    /// The member's effect discipline rather than a result-under-input:
    /// purity equations live on their own axis so a member can be both
    /// pure and, say, never-null without the two facts colliding in the
    /// lattice.
    Purity,
}

/// Identifier for one fact-under-condition about one member.
///
/// `member` is the interned external name of the compiled method; the
/// engine treats it as an opaque string key. Equality is structural and
/// keys are totally ordered so stores can iterate deterministically.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Key {
    pub member: Atom,
    pub condition: Condition,
}

impl Key {
    /// The unconditional key for a member.
    pub fn always(member: Atom) -> Key {
        Key {
            member,
            condition: Condition::Always,
        }
    }

    /// The key predicated on parameter `index` being observed `nullity`.
    pub fn param(member: Atom, index: u16, nullity: Nullity) -> Key {
        Key {
            member,
            condition: Condition::ParamIs(index, nullity),
        }
    }

    /// The purity key for a member.
    pub fn purity(member: Atom) -> Key {
        Key {
            member,
            condition: Condition::Purity,
        }
    }
}

/// Interned key handle. Cheap to copy and compare.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct KeyId(pub u32);

impl KeyId {
    /// Sentinel for "no key"; never returned for a successfully interned key.
    pub const INVALID: KeyId = KeyId(u32::MAX);
}

const SHARD_BITS: u32 = 6;
const SHARD_COUNT: usize = 1 << SHARD_BITS;
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;

struct KeyShard {
    key_to_index: RwLock<FxHashMap<Key, u32>>,
    index_to_key: RwLock<Vec<Key>>,
}

impl KeyShard {
    fn new() -> Self {
        KeyShard {
            key_to_index: RwLock::new(FxHashMap::default()),
            index_to_key: RwLock::new(Vec::new()),
        }
    }
}

/// Key interning table.
/// Thread-safe via sharded RwLocks; each insert-or-fetch holds exactly one
/// shard's lock.
pub struct KeyInterner {
    shards: [KeyShard; SHARD_COUNT],
}

impl KeyInterner {
    pub fn new() -> Self {
        KeyInterner {
            shards: std::array::from_fn(|_| KeyShard::new()),
        }
    }

    /// Intern a key and return its KeyId.
    /// If the key already exists, returns the existing KeyId.
    pub fn intern(&self, key: Key) -> KeyId {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        let shard_idx = (hasher.finish() as usize) & (SHARD_COUNT - 1);
        let shard = &self.shards[shard_idx];

        {
            let map = shard.key_to_index.read().expect("key_to_index lock poisoned");
            if let Some(&local_index) = map.get(&key) {
                return Self::make_id(local_index, shard_idx as u32);
            }
        }

        let mut map = shard.key_to_index.write().expect("key_to_index lock poisoned");
        let mut storage = shard.index_to_key.write().expect("index_to_key lock poisoned");

        if let Some(&local_index) = map.get(&key) {
            return Self::make_id(local_index, shard_idx as u32);
        }

        let local_index = storage.len() as u32;
        if local_index >= (u32::MAX >> SHARD_BITS) {
            // Session has more distinct keys than fit in the id space;
            // callers treat INVALID as an unknown key.
            return KeyId::INVALID;
        }

        storage.push(key);
        map.insert(key, local_index);

        Self::make_id(local_index, shard_idx as u32)
    }

    /// Look up the Key for a given KeyId.
    pub fn lookup(&self, id: KeyId) -> Option<Key> {
        if id == KeyId::INVALID {
            return None;
        }
        let shard_idx = (id.0 & SHARD_MASK) as usize;
        let local_index = id.0 >> SHARD_BITS;

        let shard = self.shards.get(shard_idx)?;
        let storage = shard.index_to_key.read().expect("index_to_key lock poisoned");
        storage.get(local_index as usize).copied()
    }

    /// Get the number of interned keys.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                shard
                    .index_to_key
                    .read()
                    .expect("index_to_key lock poisoned")
                    .len()
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn make_id(local_index: u32, shard_idx: u32) -> KeyId {
        KeyId((local_index << SHARD_BITS) | (shard_idx & SHARD_MASK))
    }
}

impl Default for KeyInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
