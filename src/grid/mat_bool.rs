//! Boolean grid as a set of cells.
//!
//! Set algebra only combines grids of identical size; anything else is a
//! [`GridError::SizeMismatch`].

use std::collections::VecDeque;

use serde::{Serialize, Deserialize};

use super::matrix::{directions8, Matrix};
use super::GridError;
use crate::core::pt::Pt;
use crate::core::rng::DeterministicRng;
use crate::error::Result;

/// Grid of booleans, `true` meaning "in the set".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatBool {
    grid: Matrix<bool>,
}

impl MatBool {
    /// Empty set over a grid of `size`.
    pub fn new(size: Pt) -> Result<Self> {
        Ok(Self { grid: Matrix::new(size)? })
    }

    /// Parse a text grid; cells equal to `set_char` are in the set.
    pub fn from_literal(text: &str, set_char: char) -> Result<Self> {
        Ok(Self { grid: Matrix::from_literal(text, &[(set_char, true)])? })
    }

    /// Grid dimensions.
    #[inline]
    pub fn size(&self) -> Pt {
        self.grid.size()
    }

    /// True if `pt` is inside the grid.
    #[inline]
    pub fn in_bounds(&self, pt: Pt) -> bool {
        self.grid.in_bounds(pt)
    }

    /// The underlying cell matrix.
    #[inline]
    pub fn as_matrix(&self) -> &Matrix<bool> {
        &self.grid
    }

    /// Membership of `pt`.
    pub fn at(&self, pt: Pt) -> Result<bool> {
        self.grid.get(pt).copied()
    }

    /// Add `pt` to the set.
    pub fn set(&mut self, pt: Pt) -> Result<()> {
        self.grid.set(pt, true)
    }

    /// Remove `pt` from the set.
    pub fn clear(&mut self, pt: Pt) -> Result<()> {
        self.grid.set(pt, false)
    }

    /// Add every cell.
    pub fn set_all(&mut self) {
        self.grid.cells_mut().fill(true);
    }

    /// Remove every cell.
    pub fn clear_all(&mut self) {
        self.grid.cells_mut().fill(false);
    }

    /// Number of cells in the set.
    pub fn count(&self) -> usize {
        self.grid.cells().iter().filter(|c| **c).count()
    }

    /// Union: cells set in `other` become set here.
    pub fn union_with(&mut self, other: &MatBool) -> Result<()> {
        self.combine(other, |a, b| a || b)
    }

    /// Difference: cells set in `other` become cleared here.
    pub fn subtract(&mut self, other: &MatBool) -> Result<()> {
        self.combine(other, |a, b| a && !b)
    }

    /// Intersection.
    pub fn intersect_with(&mut self, other: &MatBool) -> Result<()> {
        self.combine(other, |a, b| a && b)
    }

    /// Complement.
    pub fn negate(&mut self) {
        for cell in self.grid.cells_mut() {
            *cell = !*cell;
        }
    }

    fn combine(&mut self, other: &MatBool, op: impl Fn(bool, bool) -> bool) -> Result<()> {
        if self.size() != other.size() {
            return Err(GridError::SizeMismatch { left: self.size(), right: other.size() }.into());
        }
        for (a, b) in self.grid.cells_mut().iter_mut().zip(other.grid.cells()) {
            *a = op(*a, *b);
        }
        Ok(())
    }

    /// Set cells in row-major order.
    pub fn to_points(&self) -> Vec<Pt> {
        self.grid
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .filter_map(|(i, _)| self.grid.index_to_pt(i).ok())
            .collect()
    }

    /// Mark every point of `pts`.
    pub fn from_points(&mut self, pts: &[Pt]) -> Result<()> {
        for pt in pts {
            self.set(*pt)?;
        }
        Ok(())
    }

    /// Random cell not in the set.
    ///
    /// Rejection sampling with no attempt limit: the caller must make sure
    /// at least one cell is free.
    pub fn random_unoccupied_pos(&self, rng: &mut DeterministicRng) -> Result<Pt> {
        loop {
            let pt = self.grid.random_pos(rng)?;
            if !self.at(pt)? {
                return Ok(pt);
            }
        }
    }

    /// Random free cell, which is then added to the set.
    pub fn occupy_random_pos(&mut self, rng: &mut DeterministicRng) -> Result<Pt> {
        let pt = self.random_unoccupied_pos(rng)?;
        self.set(pt)?;
        Ok(pt)
    }

    /// All cells reachable from `start` through 8-directional steps over
    /// cells with the same value as `start`.
    pub fn connected_positions(&self, start: Pt) -> Result<MatBool> {
        let good_val = self.at(start)?;
        let mut res = MatBool::new(self.size())?;
        res.set(start)?;

        let mut queue = VecDeque::from([start]);
        while let Some(pt) = queue.pop_front() {
            for d in directions8() {
                let next = pt.plus(d)?;
                if self.in_bounds(next) && !res.at(next)? && self.at(next)? == good_val {
                    res.set(next)?;
                    queue.push_back(next);
                }
            }
        }
        Ok(res)
    }
}

impl From<Matrix<bool>> for MatBool {
    fn from(grid: Matrix<bool>) -> Self {
        Self { grid }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    fn p(x: i64, y: i64) -> Pt {
        Pt::from_ints(x, y)
    }

    fn with(size: Pt, pts: &[Pt]) -> MatBool {
        let mut m = MatBool::new(size).unwrap();
        m.from_points(pts).unwrap();
        m
    }

    #[test]
    fn test_union() {
        let mut result = with(p(4, 4), &[p(1, 2), p(3, 3)]);
        let m2 = with(p(4, 4), &[p(1, 2), p(2, 2), p(0, 0)]);
        result.union_with(&m2).unwrap();
        assert_eq!(result, with(p(4, 4), &[p(1, 2), p(2, 2), p(0, 0), p(3, 3)]));
    }

    #[test]
    fn test_union_commutative_and_idempotent() {
        let a = with(p(5, 3), &[p(0, 0), p(4, 2), p(2, 1)]);
        let b = with(p(5, 3), &[p(1, 1), p(4, 2)]);

        let mut ab = a.clone();
        ab.union_with(&b).unwrap();
        let mut ba = b.clone();
        ba.union_with(&a).unwrap();
        assert_eq!(ab, ba);

        let mut aa = a.clone();
        aa.union_with(&a).unwrap();
        assert_eq!(aa, a);
    }

    #[test]
    fn test_intersect() {
        let mut result = with(p(4, 4), &[p(1, 2), p(3, 3)]);
        let m2 = with(p(4, 4), &[p(1, 2), p(2, 2), p(0, 0)]);
        result.intersect_with(&m2).unwrap();
        assert_eq!(result, with(p(4, 4), &[p(1, 2)]));
    }

    #[test]
    fn test_subtract() {
        let mut result = with(p(4, 4), &[p(1, 2), p(3, 3)]);
        let m2 = with(p(4, 4), &[p(1, 2), p(2, 2)]);
        result.subtract(&m2).unwrap();
        assert_eq!(result, with(p(4, 4), &[p(3, 3)]));

        let a = with(p(4, 4), &[p(0, 1), p(2, 3)]);
        let mut empty = a.clone();
        empty.subtract(&a).unwrap();
        assert_eq!(empty.count(), 0);
    }

    #[test]
    fn test_negate() {
        let mut m = with(p(3, 3), &[p(1, 1)]);
        m.negate();
        assert_eq!(m.count(), 8);
        assert!(!m.at(p(1, 1)).unwrap());
        m.negate();
        assert_eq!(m, with(p(3, 3), &[p(1, 1)]));
    }

    #[test]
    fn test_size_mismatch_fails() {
        let mut a = MatBool::new(p(4, 4)).unwrap();
        let b = MatBool::new(p(4, 5)).unwrap();
        assert!(matches!(
            a.union_with(&b),
            Err(SimError::Grid(GridError::SizeMismatch { .. }))
        ));
        assert!(a.subtract(&b).is_err());
        assert!(a.intersect_with(&b).is_err());
    }

    #[test]
    fn test_points_round_trip_in_row_major_order() {
        let pts = [p(2, 0), p(0, 1), p(3, 2)];
        let m = with(p(4, 3), &[p(3, 2), p(0, 1), p(2, 0)]);
        assert_eq!(m.to_points(), pts.to_vec());
    }

    #[test]
    fn test_set_clear_all() {
        let mut m = MatBool::new(p(3, 2)).unwrap();
        m.set_all();
        assert_eq!(m.count(), 6);
        m.clear(p(2, 1)).unwrap();
        assert_eq!(m.count(), 5);
        m.clear_all();
        assert_eq!(m.count(), 0);
    }

    #[test]
    fn test_connected_positions() {
        let m = MatBool::from_literal(
            "
x---x--
--x-xx-
--x----
",
            'x',
        )
        .unwrap();

        // Flood from an `x` cell: only the x cells 8-connected to it.
        let c = m.connected_positions(p(5, 1)).unwrap();
        assert_eq!(c, with(m.size(), &[p(4, 0), p(4, 1), p(5, 1)]));

        let c = m.connected_positions(p(2, 2)).unwrap();
        assert_eq!(c, with(m.size(), &[p(2, 1), p(2, 2)]));

        let c = m.connected_positions(p(0, 0)).unwrap();
        assert_eq!(c, with(m.size(), &[p(0, 0)]));

        // Flood from a `-` cell: every `-` cell, none of the x cells.
        let c = m.connected_positions(p(1, 0)).unwrap();
        let mut dashes = m.clone();
        dashes.negate();
        assert_eq!(c, dashes);
        let mut overlap = c.clone();
        overlap.intersect_with(&m).unwrap();
        assert_eq!(overlap.count(), 0);
    }

    #[test]
    fn test_connected_positions_isolated_region() {
        // The corner `-` cell is walled off, even diagonally.
        let m = MatBool::from_literal("-x-\nxx-\n---", 'x').unwrap();
        let c = m.connected_positions(p(0, 0)).unwrap();
        assert_eq!(c, with(m.size(), &[p(0, 0)]));
        assert!(m.connected_positions(p(3, 0)).is_err());
    }

    #[test]
    fn test_occupy_random_pos() {
        let mut m = MatBool::new(p(3, 3)).unwrap();
        let mut rng = DeterministicRng::new(77);
        for n in 1..=9 {
            let pt = m.occupy_random_pos(&mut rng).unwrap();
            assert!(m.at(pt).unwrap());
            assert_eq!(m.count(), n);
        }
    }
}
