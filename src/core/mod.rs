//! Core deterministic primitives.
//!
//! All types in this module are designed for perfect cross-platform determinism:
//! integers only, every operation checked, no global state.

pub mod int;
pub mod unit;
pub mod pt;
pub mod geometry;
pub mod rng;
pub mod hash;

// Re-export core types
pub use int::{Int, NumericError, NumericResult};
pub use unit::{u, upt, UNIT};
pub use pt::Pt;
pub use geometry::{Circle, Line, Rectangle, Square};
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash, StateHasher};
