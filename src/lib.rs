//! # Vlok Simulation Kernel
//!
//! Deterministic integer-only simulation of a character chasing food across
//! an obstacle grid, with bit-exact session recording and replay.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      VLOK SIMULATION                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── int.rs      - Checked 64-bit integer                    │
//! │  ├── unit.rs     - Fixed unit scale (1 unit = 100 subunits)  │
//! │  ├── pt.rs       - 2D integer point / vector                 │
//! │  ├── geometry.rs - Lines, squares, rectangles, circles       │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  grid/           - Tile grids                                │
//! │  ├── matrix.rs   - Generic row-major matrix                  │
//! │  ├── mat_bool.rs - Boolean occupancy grid                    │
//! │  └── pathfinding.rs - Reusable 8-way BFS                     │
//! │                                                              │
//! │  game/           - Simulation (deterministic)                │
//! │  ├── input.rs    - Per-frame player input                    │
//! │  ├── state.rs    - World, character, food                    │
//! │  ├── tick.rs     - Step function and replay                  │
//! │  └── recording.rs- Session codec and recording store         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/`, `grid/` and `game/` modules are **100% deterministic**:
//! - No floating-point arithmetic
//! - Every arithmetic operation is checked; overflow is an error, not a wrap
//! - No system time dependencies outside recording file names
//! - All randomness from seeded Xorshift128+
//!
//! Given identical seed, difficulty and inputs, a replay produces
//! **identical results** on any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod grid;
pub mod game;
pub mod error;

// Re-export commonly used types
pub use crate::core::int::Int;
pub use crate::core::pt::Pt;
pub use crate::core::unit::{u, upt, UNIT};
pub use crate::core::rng::DeterministicRng;
pub use crate::error::{Result, SimError};
pub use crate::game::input::PlayerInput;
pub use crate::game::recording::{FailurePolicy, Recording, RecordingStore};
pub use crate::game::state::{World, WorldConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal simulation rate (Hz)
pub const TICK_RATE: u32 = 60;
