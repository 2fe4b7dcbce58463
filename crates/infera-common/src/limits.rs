//! Centralized limits and thresholds for the inference engine.
//!
//! This module provides shared constants for ingestion bounds and solver
//! safety valves used throughout the workspace. Centralizing these values:
//! - Prevents duplicate definitions with inconsistent values
//! - Makes it easy to tune limits in one place
//! - Documents the rationale for each limit

/// Maximum nesting depth accepted for an equation's right-hand side.
///
/// Equations produced by the indexing service are shallow (a join of
/// conjunctions is depth 3); anything deeper is either corrupt index data
/// or a hostile payload, and is dropped at ingestion before any recursive
/// walk could touch it.
pub const MAX_EXPR_DEPTH: usize = 32;

/// Maximum parameter count a conditional key may refer to.
///
/// Mirrors the class-file limit of 255 method parameters. A condition
/// indexing a parameter at or past the member's declared arity is dropped
/// at ingestion.
pub const MAX_CONTRACT_PARAMS: u16 = 255;

/// Iteration count at which the fixpoint loop logs a warning.
///
/// The lattice has finite height so the loop always terminates; crossing
/// this threshold means the equation graph is far larger than any scope
/// we expect to index and is worth surfacing in logs.
pub const SOLVE_ITERATION_WARN: u64 = 1_000_000;
