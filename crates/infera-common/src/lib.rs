//! Shared building blocks for the infera fact-inference engine.
//!
//! This crate holds the pieces every other infera crate depends on:
//!
//! - **String interning** ([`interner`]): member names, annotation names,
//!   and rendered parameter text are deduplicated into `u32` [`Atom`]
//!   handles so equality is an integer comparison.
//! - **Limits** ([`limits`]): centralized tunables for ingestion bounds
//!   and solver safety valves.

pub mod interner;
pub mod limits;

pub use interner::{Atom, ShardedInterner};
