//! Grid containers and grid algorithms.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  Matrix<T>   │ ──▶ │   MatBool    │     │  Pathfinder  │
//! │  row-major   │     │  set algebra │     │  BFS, reused │
//! │  y*w + x     │     │  flood fill  │     │  buffers     │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!        └────────────── adjacency built once ──────┘
//! ```
//!
//! All accesses are bounds-checked: an out-of-range point is a
//! [`GridError`], never a read of some other cell.

pub mod matrix;
pub mod mat_bool;
pub mod pathfinding;

use thiserror::Error;

use crate::core::pt::Pt;

pub use matrix::{directions8, Matrix};
pub use mat_bool::MatBool;
pub use pathfinding::{find_path, Pathfinder};

/// Grid contract violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// Point outside the grid.
    #[error("point {pt:?} is outside grid of size {size:?}")]
    OutOfBounds {
        /// Offending point.
        pt: Pt,
        /// Grid size.
        size: Pt,
    },

    /// Flat index past the last cell.
    #[error("index {index} is outside grid with {len} cells")]
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of cells.
        len: usize,
    },

    /// Two grids combined with different sizes.
    #[error("trying to combine grids of different sizes: {left:?} and {right:?}")]
    SizeMismatch {
        /// Size of the grid being modified.
        left: Pt,
        /// Size of the other grid.
        right: Pt,
    },

    /// Grid dimensions not strictly positive.
    #[error("invalid grid size {0:?}")]
    InvalidSize(Pt),
}
