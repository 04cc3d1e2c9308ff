//! Grid buffers and their seed pattern.
//!
//! The harness works on a pair of equally sized square `u32` grids, A and
//! B, that alternate source/destination roles across rounds. Both paths
//! start from the identical seed written into A, which is what makes the
//! final checksums comparable.

use crate::error::{Result, StencilError};
use std::ops::{Index, IndexMut};

/// Value of the fixed checkpoint cell at (4,4).
pub const SENTINEL_VALUE: u32 = 0x0fff_ffff;

/// Row/column of the checkpoint cell.
pub const SENTINEL_CELL: (usize, usize) = (4, 4);

/// Marker cells sit at every `MARKER_STRIDE`-th row and column...
const MARKER_STRIDE: usize = 8;
/// ...starting from this offset.
const MARKER_OFFSET: usize = 4;

/// Seed value of the marker cell at row `y`, column `x`.
#[allow(clippy::cast_possible_truncation)] // coordinates never exceed the grid side
const fn marker_value(y: usize, x: usize) -> u32 {
    ((y as u32) << 16).wrapping_add((x as u32) << 4)
}

/// A square matrix of `u32` cells in one contiguous heap allocation.
#[derive(Debug, Clone)]
pub struct Grid {
    side: usize,
    cells: Box<[u32]>,
}

impl Grid {
    /// Allocate a zeroed grid of `side` × `side` cells.
    pub fn new(side: usize) -> Self {
        Self {
            side,
            cells: vec![0u32; side * side].into_boxed_slice(),
        }
    }

    /// Side length in cells.
    pub const fn side(&self) -> usize {
        self.side
    }

    /// All cells, row-major.
    pub fn words(&self) -> &[u32] {
        &self.cells
    }

    /// Row `y` as a slice of `side` cells.
    pub fn row(&self, y: usize) -> &[u32] {
        &self.cells[y * self.side..(y + 1) * self.side]
    }

    /// Row `y`, mutable.
    pub fn row_mut(&mut self, y: usize) -> &mut [u32] {
        &mut self.cells[y * self.side..(y + 1) * self.side]
    }

    /// Zero every cell.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Write the seed pattern: marker cells on the sparse lattice, then
    /// the sentinel. Cells outside the lattice are left as they are, so
    /// call [`Grid::clear`] first for a full reset.
    pub fn seed(&mut self) {
        let n = self.side;
        for y in (MARKER_OFFSET..n).step_by(MARKER_STRIDE) {
            for x in (MARKER_OFFSET..n).step_by(MARKER_STRIDE) {
                self[(y, x)] = marker_value(y, x);
            }
        }
        let (sy, sx) = SENTINEL_CELL;
        if sy < n && sx < n {
            self[(sy, sx)] = SENTINEL_VALUE;
        }
    }

    /// Wrapping `u32` sum over all cells, borders included.
    pub fn checksum(&self) -> u32 {
        self.cells.iter().fold(0u32, |acc, &v| acc.wrapping_add(v))
    }

    /// Storage viewed as bytes, for the cache-maintenance collaborator.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }

    /// Base address of the storage, narrowed to the engine's 32-bit
    /// pointer registers.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::AddressOverflow`] when the allocation sits
    /// above the engine's 4 GiB reach. Bare-metal targets never hit this;
    /// a hosted run with an unconstrained allocator can.
    pub fn base_addr(&self) -> Result<u32> {
        let addr = self.cells.as_ptr() as usize;
        u32::try_from(addr).map_err(|_| StencilError::AddressOverflow { addr })
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = u32;

    fn index(&self, (y, x): (usize, usize)) -> &u32 {
        &self.cells[y * self.side + x]
    }
}

impl IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, (y, x): (usize, usize)) -> &mut u32 {
        &mut self.cells[y * self.side + x]
    }
}

/// The two named grid instances, A and B.
///
/// A carries the seed; B starts zeroed. The scheduler alternates their
/// roles, never letting both hold the same one.
#[derive(Debug)]
pub struct GridPair {
    a: Grid,
    b: Grid,
}

impl GridPair {
    /// Allocate a zeroed pair of `side` × `side` grids.
    pub fn new(side: usize) -> Self {
        Self {
            a: Grid::new(side),
            b: Grid::new(side),
        }
    }

    /// Zero both grids, then seed A. Run before each benchmark path so
    /// the paths start from identical state.
    pub fn reset(&mut self) {
        self.a.clear();
        self.b.clear();
        self.a.seed();
        tracing::debug!("grid pair reset and seeded ({} cells/side)", self.a.side());
    }

    /// Grid A.
    pub fn a(&self) -> &Grid {
        &self.a
    }

    /// Grid B.
    pub fn b(&self) -> &Grid {
        &self.b
    }

    /// Both grids, mutably, for role alternation.
    pub fn halves_mut(&mut self) -> (&mut Grid, &mut Grid) {
        (&mut self.a, &mut self.b)
    }
}
