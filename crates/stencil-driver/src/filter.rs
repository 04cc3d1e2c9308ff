//! Filter abstraction — the seam between the scheduler and the two paths.

use crate::error::Result;
use crate::grid::Grid;
use std::fmt::Debug;

/// One round of filtering: read `src`, write `dst`.
///
/// Both implementations honour the same shape contract: interior cells
/// get the 3×3 neighbourhood mean, border cells of `dst` are left
/// untouched. The scheduler drives either through this trait without
/// caring which substrate does the arithmetic.
pub trait GridFilter: Debug {
    /// Apply one filtering round from `src` into `dst`.
    ///
    /// # Errors
    ///
    /// Returns an error if the grids disagree in size or, on the offload
    /// path, a buffer address cannot be expressed to the engine.
    fn apply(&mut self, src: &Grid, dst: &mut Grid) -> Result<()>;

    /// Which path this filter runs on, for reporting.
    fn kind(&self) -> FilterKind;
}

/// Filter path identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// CPU reference implementation.
    Software,
    /// Memory-mapped offload engine.
    Accelerator,
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Software => write!(f, "software"),
            Self::Accelerator => write!(f, "accelerator"),
        }
    }
}
