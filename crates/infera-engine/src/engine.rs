//! The engine facade: one long-lived object per session.
//!
//! `facts_for` is the read path: it resolves the current epoch's fact
//! table (building it on first touch) and looks the member up. The solve
//! runs synchronously on whichever caller thread got there first;
//! concurrent callers during that window block on the same build and all
//! receive the same table.
//!
//! `materialize` is independent of the cache: facts are value-interned,
//! so a rendered form stays valid across epochs and is memoized per
//! distinct fact.

use crate::cache::FactCache;
use crate::facts::{Fact, FactTable, project, render_annotation};
use crate::source::{EquationSource, ingest};
use dashmap::DashMap;
use infera_common::{Atom, ShardedInterner};
use infera_solver::{EquationStore, solve};
use std::sync::Arc;

/// The static fact-inference engine.
///
/// Constructed once per session with a fixed set of equation sources;
/// shared by reference across any number of reader threads. External
/// change notifications arrive as [`InferenceEngine::invalidate`].
pub struct InferenceEngine {
    sources: Vec<Arc<dyn EquationSource>>,
    names: ShardedInterner,
    cache: FactCache,
    rendered: DashMap<Fact, Arc<str>>,
}

impl InferenceEngine {
    pub fn new(sources: Vec<Arc<dyn EquationSource>>) -> Self {
        let names = ShardedInterner::new();
        names.intern_common();
        InferenceEngine {
            sources,
            names,
            cache: FactCache::new(),
            rendered: DashMap::new(),
        }
    }

    /// Every inferred fact for a member, by its external name.
    ///
    /// Returns the empty list (not an error) when nothing is known. The
    /// first call after construction or invalidation blocks on the full
    /// build; later calls are a map lookup.
    pub fn facts_for(&self, member: &str) -> Vec<Fact> {
        let table = self.cache.get_or_build(|| self.build());
        let atom = self.names.intern(member);
        table.get(&atom).cloned().unwrap_or_default()
    }

    /// Render a fact into its external annotation form, e.g.
    /// `@org.jetbrains.annotations.Contract("null, _ -> fail")`.
    ///
    /// Memoized per distinct fact; a fact whose text cannot be synthesized
    /// is logged and reported as `None`, never an error.
    pub fn materialize(&self, fact: Fact) -> Option<Arc<str>> {
        if let Some(hit) = self.rendered.get(&fact) {
            return Some(Arc::clone(&hit));
        }

        let Some(name) = self.names.try_resolve(fact.name) else {
            tracing::warn!(atom = fact.name.index(), "materialize: unresolvable annotation name");
            return None;
        };
        if name.is_empty() {
            tracing::warn!("materialize: fact with empty annotation name");
            return None;
        }
        let parameters = match self.names.try_resolve(fact.parameters) {
            Some(parameters) => parameters,
            None => {
                tracing::warn!(
                    atom = fact.parameters.index(),
                    "materialize: unresolvable parameter text"
                );
                return None;
            }
        };

        // The entry guard is the critical section: same-fact callers
        // serialize here and the construction runs once, while distinct
        // facts proceed on other shards.
        let rendered = self
            .rendered
            .entry(fact)
            .or_insert_with(|| Arc::from(render_annotation(&name, &parameters)));
        Some(Arc::clone(&rendered))
    }

    /// Drop the fact cache; the next query rebuilds from the sources.
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    /// Resolve an interned atom back to its text (fact names, parameter
    /// strings, member names).
    pub fn resolve_atom(&self, atom: Atom) -> Option<Arc<str>> {
        self.names.try_resolve(atom)
    }

    /// Current cache epoch, advanced by each invalidation.
    pub fn epoch(&self) -> u64 {
        self.cache.epoch()
    }

    fn build(&self) -> FactTable {
        let mut store = EquationStore::new();
        let mut accepted = 0usize;
        let mut dropped = 0usize;

        for source in &self.sources {
            source.for_each_equation(&mut |eq| {
                if ingest(&mut store, &self.names, eq) {
                    accepted += 1;
                } else {
                    dropped += 1;
                }
            });
        }

        let solution = solve(&store);
        let table = project(&store, &solution, &self.names);
        tracing::debug!(
            accepted,
            dropped,
            members = table.len(),
            "engine: fact table built"
        );
        table
    }
}
