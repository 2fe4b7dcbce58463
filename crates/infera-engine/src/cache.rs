//! The epoch-guarded fact cache.
//!
//! One build per epoch, at most one build at a time: the epoch holds a
//! single-flight cell, and every reader that arrives before the build
//! finishes blocks on that same cell and receives the identical table.
//! Invalidation swaps in a fresh epoch; readers that already hold the old
//! epoch finish against its table, so no reader ever observes a mix of
//! two epochs.

use crate::facts::FactTable;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

struct Epoch {
    seq: u64,
    table: OnceCell<Arc<FactTable>>,
}

/// Lazily built, invalidation-aware holder of the current fact table.
pub struct FactCache {
    current: RwLock<Arc<Epoch>>,
    next_seq: AtomicU64,
}

impl FactCache {
    pub fn new() -> Self {
        FactCache {
            current: RwLock::new(Arc::new(Epoch {
                seq: 0,
                table: OnceCell::new(),
            })),
            next_seq: AtomicU64::new(1),
        }
    }

    /// The current epoch's table, building it if this epoch has none yet.
    ///
    /// The read lock is only held long enough to clone the epoch handle;
    /// the build itself runs outside it, so `invalidate` is never blocked
    /// behind a build.
    pub fn get_or_build(&self, build: impl FnOnce() -> FactTable) -> Arc<FactTable> {
        let epoch = {
            let guard = match self.current.read() {
                Ok(guard) => guard,
                Err(e) => e.into_inner(),
            };
            Arc::clone(&guard)
        };

        epoch
            .table
            .get_or_init(|| {
                tracing::debug!(epoch = epoch.seq, "fact cache: building");
                Arc::new(build())
            })
            .clone()
    }

    /// Drop the current epoch. The next query triggers a full rebuild.
    pub fn invalidate(&self) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(e) => e.into_inner(),
        };
        *guard = Arc::new(Epoch {
            seq,
            table: OnceCell::new(),
        });
        tracing::debug!(epoch = seq, "fact cache: invalidated");
    }

    /// Sequence number of the current epoch.
    pub fn epoch(&self) -> u64 {
        let guard = match self.current.read() {
            Ok(guard) => guard,
            Err(e) => e.into_inner(),
        };
        guard.seq
    }

    /// Whether the current epoch has a published table.
    pub fn is_built(&self) -> bool {
        let guard = match self.current.read() {
            Ok(guard) => guard,
            Err(e) => e.into_inner(),
        };
        guard.table.get().is_some()
    }
}

impl Default for FactCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
