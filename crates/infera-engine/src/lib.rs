//! Queryable fact-inference engine.
//!
//! This crate wires the fixpoint solver into a long-lived, concurrently
//! readable engine:
//!
//! - **Equation sources** ([`source`]): the boundary to the external
//!   indexing service, injected as a fixed set at construction
//! - **Fact cache** ([`cache`]): one lazily built, immutable fact table
//!   per invalidation epoch, guarded by a single-flight cell
//! - **Facts & projection** ([`facts`]): informative solution values
//!   projected into per-member inferred annotations
//! - **Engine facade** ([`engine`]): `facts_for` / `materialize` /
//!   `invalidate`
//!
//! Readers never synchronize to traverse published data: a fact table is
//! immutable once its epoch publishes it, and the only post-publication
//! mutation points are the interning tables, each guarded by a narrow
//! insert-or-fetch critical section.

pub mod cache;
pub mod engine;
pub mod facts;
pub mod source;

pub use cache::FactCache;
pub use engine::InferenceEngine;
pub use facts::{Fact, FactTable, annotations};
pub use source::{EquationSource, RawExpr, SourceEquation};

// Re-exported so equation sources can be written against this crate alone.
pub use infera_common::Atom;
pub use infera_solver::{Condition, Nullity, Value};
