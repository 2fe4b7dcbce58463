//! Equation-Based Fact Solver
//!
//! This crate implements the whole-program fixpoint core of the inference
//! engine. It uses:
//!
//! - **Interned keys**: one `KeyId` per (member, condition) pair, so
//!   dependency edges are u32 comparisons
//! - **A finite flat lattice**: the value domain facts are computed over,
//!   with `Bot`/`Top` sentinels bounding iteration
//! - **Chaotic worklist iteration**: cycles need no special handling and
//!   no recursion ever follows the dependency graph
//!
//! Key benefits:
//! - Deterministic solutions regardless of equation arrival order
//! - Malformed equations are rejected at ingestion, never at solve time
//! - Solving cannot raise: degenerate inputs settle at the safe `Top`

pub mod equation;
pub mod key;
pub mod lattice;
pub mod solve;
pub mod store;

pub use equation::{Equation, EquationError, Expr};
pub use key::{Condition, Key, KeyId, KeyInterner, Nullity};
pub use lattice::Value;
pub use solve::{Solution, solve};
pub use store::EquationStore;
