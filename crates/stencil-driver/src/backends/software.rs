// SPDX-License-Identifier: AGPL-3.0-only

//! Software reference filter.
//!
//! Pure CPU implementation of the 3×3 averaging round. This is the
//! ground truth the offload engine's output is validated against: run
//! both paths from the same seed and the final checksums must match.
//!
//! ## Arithmetic model
//!
//! Cell sums wrap modulo 2³² and the mean truncates toward zero —
//! the same arithmetic the engine performs in fixed-width logic, so the
//! two paths stay bit-comparable even when the seed's sentinel value
//! drives neighbourhood sums past `u32::MAX`.

use crate::error::{Result, StencilError};
use crate::filter::{FilterKind, GridFilter};
use crate::grid::{Grid, SENTINEL_CELL, SENTINEL_VALUE};

/// The fixed checkpoint cell the reference filter stamps after each
/// round, regardless of what the averaging computed there.
///
/// The engine computes the same stamp in its own logic; keeping the cell
/// hot on both paths makes it a cheap single-cell oracle on top of the
/// full checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentinelCell {
    /// Row of the checkpoint cell.
    pub row: usize,
    /// Column of the checkpoint cell.
    pub col: usize,
    /// Value stamped into the cell.
    pub value: u32,
}

impl Default for SentinelCell {
    fn default() -> Self {
        let (row, col) = SENTINEL_CELL;
        Self {
            row,
            col,
            value: SENTINEL_VALUE,
        }
    }
}

/// CPU reference implementation of one filtering round.
#[derive(Debug)]
pub struct SoftwareFilter {
    sentinel: Option<SentinelCell>,
}

impl Default for SoftwareFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftwareFilter {
    /// Reference filter with the standard checkpoint stamp at (4,4).
    pub fn new() -> Self {
        Self {
            sentinel: Some(SentinelCell::default()),
        }
    }

    /// Reference filter without the checkpoint stamp, for grids too
    /// small to contain it.
    pub fn without_sentinel() -> Self {
        Self { sentinel: None }
    }

    /// Reference filter with a custom checkpoint cell.
    pub fn with_sentinel(sentinel: SentinelCell) -> Self {
        Self {
            sentinel: Some(sentinel),
        }
    }
}

impl GridFilter for SoftwareFilter {
    fn apply(&mut self, src: &Grid, dst: &mut Grid) -> Result<()> {
        let n = src.side();
        if n != dst.side() {
            return Err(StencilError::SizeMismatch {
                src: n,
                dst: dst.side(),
            });
        }

        for y in 1..n - 1 {
            let above = src.row(y - 1);
            let here = src.row(y);
            let below = src.row(y + 1);
            let out = dst.row_mut(y);
            for x in 1..n - 1 {
                let sum = above[x - 1]
                    .wrapping_add(above[x])
                    .wrapping_add(above[x + 1])
                    .wrapping_add(here[x - 1])
                    .wrapping_add(here[x])
                    .wrapping_add(here[x + 1])
                    .wrapping_add(below[x - 1])
                    .wrapping_add(below[x])
                    .wrapping_add(below[x + 1]);
                out[x] = sum / 9;
            }
        }

        if let Some(s) = self.sentinel {
            if s.row < n && s.col < n {
                dst[(s.row, s.col)] = s.value;
            }
        }

        Ok(())
    }

    fn kind(&self) -> FilterKind {
        FilterKind::Software
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(filter: &mut SoftwareFilter, src: &Grid, dst: &mut Grid) {
        filter.apply(src, dst).expect("matching grid sizes");
    }

    #[test]
    fn point_source_spreads_over_its_neighbourhood() {
        let mut src = Grid::new(16);
        src[(8, 8)] = 900;
        let mut dst = Grid::new(16);
        let mut f = SoftwareFilter::without_sentinel();
        apply(&mut f, &src, &mut dst);

        // Every interior cell whose 3×3 window covers (8,8) averages to
        // 900/9; the rest of the interior stays zero.
        for y in 1..15 {
            for x in 1..15 {
                let touched = (7..=9).contains(&y) && (7..=9).contains(&x);
                assert_eq!(dst[(y, x)], if touched { 100 } else { 0 }, "at ({y},{x})");
            }
        }
    }

    #[test]
    fn mean_truncates_toward_zero() {
        let mut src = Grid::new(8);
        src[(3, 3)] = 0xAB; // 171 / 9 = 19
        let mut dst = Grid::new(8);
        let mut f = SoftwareFilter::without_sentinel();
        apply(&mut f, &src, &mut dst);
        assert_eq!(dst[(3, 3)], 19);
    }

    #[test]
    fn neighbourhood_sum_wraps_like_hardware() {
        let mut src = Grid::new(8);
        // Two maxed cells in one window: 2 * 0xffffffff wraps to
        // 0xfffffffe before the division.
        src[(3, 3)] = u32::MAX;
        src[(3, 4)] = u32::MAX;
        let mut dst = Grid::new(8);
        let mut f = SoftwareFilter::without_sentinel();
        apply(&mut f, &src, &mut dst);
        assert_eq!(dst[(3, 3)], 0xffff_fffe / 9);
    }

    #[test]
    fn borders_are_never_written() {
        let mut src = Grid::new(8);
        src.seed();
        let mut dst = Grid::new(8);
        for i in 0..8 {
            dst[(0, i)] = 0x5a5a_5a5a;
            dst[(7, i)] = 0x5a5a_5a5a;
            dst[(i, 0)] = 0x5a5a_5a5a;
            dst[(i, 7)] = 0x5a5a_5a5a;
        }
        let mut f = SoftwareFilter::without_sentinel();
        apply(&mut f, &src, &mut dst);
        for i in 0..8 {
            assert_eq!(dst[(0, i)], 0x5a5a_5a5a);
            assert_eq!(dst[(7, i)], 0x5a5a_5a5a);
            assert_eq!(dst[(i, 0)], 0x5a5a_5a5a);
            assert_eq!(dst[(i, 7)], 0x5a5a_5a5a);
        }
    }

    #[test]
    fn sentinel_survives_every_round() {
        let mut src = Grid::new(16);
        src.seed();
        let mut dst = Grid::new(16);
        let mut f = SoftwareFilter::new();
        apply(&mut f, &src, &mut dst);
        assert_eq!(dst[(4, 4)], SENTINEL_VALUE);
        // And again with the smoothed grid as source: still stamped.
        let mut second = Grid::new(16);
        apply(&mut f, &dst, &mut second);
        assert_eq!(second[(4, 4)], SENTINEL_VALUE);
    }

    #[test]
    fn relocated_sentinel_fits_small_grids() {
        let mut src = Grid::new(4);
        src[(1, 1)] = 0xAB;
        let mut dst = Grid::new(4);
        let mut f = SoftwareFilter::with_sentinel(SentinelCell {
            row: 2,
            col: 2,
            value: 0x77,
        });
        apply(&mut f, &src, &mut dst);
        // The stamp lands after the averaging pass and overrides it.
        assert_eq!(dst[(2, 2)], 0x77);
        assert_eq!(dst[(1, 1)], 0xAB / 9);
    }

    #[test]
    fn four_cell_grid_single_marker() {
        let mut src = Grid::new(4);
        src[(1, 1)] = 0xAB;
        let mut dst = Grid::new(4);
        let mut f = SoftwareFilter::without_sentinel();
        apply(&mut f, &src, &mut dst);

        assert_eq!(dst[(1, 1)], 0xAB / 9);
        for i in 0..4 {
            assert_eq!(dst[(0, i)], 0);
            assert_eq!(dst[(3, i)], 0);
            assert_eq!(dst[(i, 0)], 0);
            assert_eq!(dst[(i, 3)], 0);
        }
    }

    #[test]
    fn mismatched_sizes_refused() {
        let src = Grid::new(8);
        let mut dst = Grid::new(16);
        let mut f = SoftwareFilter::new();
        assert!(f.apply(&src, &mut dst).is_err());
    }
}
