//! Generic fixed-size 2D grid.
//!
//! Cells are stored row-major: the cell at `(x, y)` lives at index
//! `y * width + x`. The size never changes after construction.

use serde::{Serialize, Deserialize};

use super::GridError;
use crate::core::int::Int;
use crate::core::pt::Pt;
use crate::core::rng::DeterministicRng;
use crate::error::Result;

/// The 8 neighbor offsets.
///
/// Order is left, right, up, down, then the diagonals up-left, up-right,
/// down-left, down-right. Pathfinding relies on this order to prefer
/// straight moves over diagonal ones.
pub const fn directions8() -> [Pt; 8] {
    [
        Pt::from_ints(-1, 0),
        Pt::from_ints(1, 0),
        Pt::from_ints(0, -1),
        Pt::from_ints(0, 1),
        Pt::from_ints(-1, -1),
        Pt::from_ints(1, -1),
        Pt::from_ints(-1, 1),
        Pt::from_ints(1, 1),
    ]
}

/// Fixed-size grid of `T`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matrix<T> {
    cells: Vec<T>,
    size: Pt,
}

impl<T: Clone + Default> Matrix<T> {
    /// Grid of `size.x` columns and `size.y` rows, filled with `T::default()`.
    pub fn new(size: Pt) -> Result<Self> {
        if !size.x.is_positive() || !size.y.is_positive() {
            return Err(GridError::InvalidSize(size).into());
        }
        let len = size.x.times(size.y)?.to_index()?;
        Ok(Self { cells: vec![T::default(); len], size })
    }

    /// Build a grid from a text block.
    ///
    /// One leading newline is skipped so literals can start on their own
    /// line. Every other line is a row; a last line without a trailing
    /// newline still counts. The width is the longest row. Characters found
    /// in `mapping` set their cell, others leave the default value.
    pub fn from_literal(text: &str, mapping: &[(char, T)]) -> Result<Self> {
        let body = text.strip_prefix('\n').unwrap_or(text);
        let body = body.strip_suffix('\n').unwrap_or(body);
        let rows: Vec<&str> = body.split('\n').collect();

        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let size = Pt::new(Int::from_index(width)?, Int::from_index(rows.len())?);
        let mut m = Self::new(size)?;

        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if let Some((_, val)) = mapping.iter().find(|(k, _)| *k == c) {
                    let pt = Pt::new(Int::from_index(x)?, Int::from_index(y)?);
                    m.set(pt, val.clone())?;
                }
            }
        }
        Ok(m)
    }
}

impl<T> Matrix<T> {
    /// Grid size as (columns, rows).
    #[inline]
    pub fn size(&self) -> Pt {
        self.size
    }

    /// All cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// True if `pt` is inside the grid.
    pub fn in_bounds(&self, pt: Pt) -> bool {
        in_bounds(self.size, pt)
    }

    /// Row-major cell index of `pt`.
    pub fn pt_to_index(&self, pt: Pt) -> Result<usize> {
        pt_to_index(self.size, pt)
    }

    /// Grid point of a row-major cell index.
    pub fn index_to_pt(&self, index: usize) -> Result<Pt> {
        index_to_pt(self.size, self.cells.len(), index)
    }

    /// Cell at `pt`.
    pub fn get(&self, pt: Pt) -> Result<&T> {
        let index = self.pt_to_index(pt)?;
        self.cells
            .get(index)
            .ok_or_else(|| GridError::OutOfBounds { pt, size: self.size }.into())
    }

    /// Overwrite the cell at `pt`.
    pub fn set(&mut self, pt: Pt, val: T) -> Result<()> {
        let index = self.pt_to_index(pt)?;
        let size = self.size;
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(GridError::OutOfBounds { pt, size })?;
        *cell = val;
        Ok(())
    }

    /// Uniformly random in-bounds point.
    pub fn random_pos(&self, rng: &mut DeterministicRng) -> Result<Pt> {
        let x = rng.uniform_int(Int::ZERO, self.size.x.minus(Int::ONE)?)?;
        let y = rng.uniform_int(Int::ZERO, self.size.y.minus(Int::ONE)?)?;
        Ok(Pt::new(x, y))
    }
}

#[inline]
pub(crate) fn in_bounds(size: Pt, pt: Pt) -> bool {
    pt.x.is_non_negative() && pt.y.is_non_negative() && pt.x.lt(size.x) && pt.y.lt(size.y)
}

pub(crate) fn pt_to_index(size: Pt, pt: Pt) -> Result<usize> {
    if !in_bounds(size, pt) {
        return Err(GridError::OutOfBounds { pt, size }.into());
    }
    Ok(pt.y.times(size.x)?.plus(pt.x)?.to_index()?)
}

pub(crate) fn index_to_pt(size: Pt, len: usize, index: usize) -> Result<Pt> {
    if index >= len {
        return Err(GridError::IndexOutOfRange { index, len }.into());
    }
    let i = Int::from_index(index)?;
    Ok(Pt::new(i.modulo(size.x)?, i.div_by(size.x)?))
}

// =============================================================================
// TESTS
// =============================================================================
