//! Breadth-first pathfinding over a grid.
//!
//! ## Layout
//!
//! ```text
//! neighbors: [ n0 n1 .. n7 | n0 n1 .. n7 | ... ]   8 slots per cell,
//!              cell 0        cell 1                 in directions8() order
//!
//! visited / parents / queue: one slot per cell, cleared per query
//! ```
//!
//! The adjacency table is built once from the grid; queries only touch the
//! scratch buffers, which are never reallocated.

use super::matrix::{directions8, index_to_pt, pt_to_index, Matrix};
use crate::core::pt::Pt;
use crate::error::Result;

const N_DIRS: usize = 8;

/// Reusable BFS pathfinder for one grid and one traversable value.
#[derive(Clone, Debug)]
pub struct Pathfinder {
    size: Pt,
    n_cells: usize,
    neighbors: Vec<Option<usize>>,
    visited: Vec<bool>,
    parents: Vec<Option<usize>>,
    queue: Vec<usize>,
}

impl Pathfinder {
    /// Build the adjacency table of `m`.
    ///
    /// A neighbor is valid when it is in bounds and its cell equals
    /// `traversable`. The cell itself does not need to be traversable.
    pub fn new<T: PartialEq>(m: &Matrix<T>, traversable: &T) -> Result<Self> {
        let size = m.size();
        let n_cells = m.cells().len();
        let dirs = directions8();

        let mut neighbors = vec![None; n_cells * N_DIRS];
        for (index, slots) in neighbors.chunks_exact_mut(N_DIRS).enumerate() {
            let pt = m.index_to_pt(index)?;
            for (slot, dir) in slots.iter_mut().zip(dirs.iter()) {
                let neighbor = pt.plus(*dir)?;
                if m.in_bounds(neighbor) && m.get(neighbor)? == traversable {
                    *slot = Some(m.pt_to_index(neighbor)?);
                }
            }
        }

        Ok(Self {
            size,
            n_cells,
            neighbors,
            visited: vec![false; n_cells],
            parents: vec![None; n_cells],
            queue: Vec::with_capacity(n_cells),
        })
    }

    /// Size of the grid this pathfinder was built for.
    pub fn size(&self) -> Pt {
        self.size
    }

    /// Shortest 8-directional path from `start` to `end`, both included.
    ///
    /// Returns an empty path when `end` cannot be reached. Among paths of
    /// equal length, straight steps win over diagonal ones.
    pub fn find_path(&mut self, start: Pt, end: Pt) -> Result<Vec<Pt>> {
        let start = pt_to_index(self.size, start)?;
        let end = pt_to_index(self.size, end)?;

        self.queue.clear();
        self.visited.fill(false);
        self.parents.fill(None);

        self.queue.push(start);
        self.visited[start] = true;

        let mut idx = 0;
        while let Some(&top) = self.queue.get(idx) {
            if top == end {
                return self.compute_path(end);
            }

            let base = top * N_DIRS;
            for n in self.neighbors[base..base + N_DIRS].iter().flatten() {
                if !self.visited[*n] {
                    self.queue.push(*n);
                    self.parents[*n] = Some(top);
                    self.visited[*n] = true;
                }
            }

            idx += 1;
        }
        Ok(Vec::new())
    }

    fn compute_path(&self, end: usize) -> Result<Vec<Pt>> {
        let mut path = Vec::new();
        let mut node = Some(end);
        while let Some(index) = node {
            path.push(index_to_pt(self.size, self.n_cells, index)?);
            node = self.parents[index];
        }
        path.reverse();
        Ok(path)
    }
}

/// One-shot path search; builds a throwaway [`Pathfinder`].
pub fn find_path<T: PartialEq>(m: &Matrix<T>, traversable: &T, start: Pt, end: Pt) -> Result<Vec<Pt>> {
    Pathfinder::new(m, traversable)?.find_path(start, end)
}

// =============================================================================
// TESTS
// =============================================================================
