//! Benchmark orchestration: reset, time, schedule, checksum, report.
//!
//! One [`Benchmark`] holds the grid pair and round count; each `run_*`
//! call is a complete path measurement starting from a fresh seed. The
//! offload variant adds the one-time cache write-back and times it
//! separately, so the report can show how much of the total the flush
//! costs.

use crate::cache::CacheMaintenance;
use crate::error::Result;
use crate::filter::{FilterKind, GridFilter};
use crate::grid::{Grid, GridPair};
use crate::schedule::{run_rounds, ScheduleOutcome, Slot};
use std::time::{Duration, Instant};

/// Grid side length of the standard measurement.
pub const DEFAULT_GRID_SIZE: usize = 512;

/// Round count of the standard measurement.
pub const DEFAULT_ROUNDS: usize = 100;

/// Rows of the final grid carried in the report preview.
pub const PREVIEW_ROWS: usize = 16;

/// Columns of the final grid carried in the report preview.
pub const PREVIEW_COLS: usize = 8;

/// Everything one path measurement produced.
#[derive(Debug, Clone)]
pub struct BenchReport {
    /// Which path ran.
    pub kind: FilterKind,
    /// Rounds executed.
    pub rounds_run: usize,
    /// Slot that held the final output.
    pub final_slot: Slot,
    /// Wrapping sum over the final grid, borders included.
    pub checksum: u32,
    /// Wall time from seed to final round.
    pub elapsed: Duration,
    /// Cache write-back time, offload path only. Included in `elapsed`.
    pub flush: Option<Duration>,
    /// Top-left corner of the final grid, up to 16 rows × 8 columns.
    pub preview: Vec<Vec<u32>>,
}

/// Orchestrates one comparative measurement over a grid pair.
#[derive(Debug)]
pub struct Benchmark {
    pair: GridPair,
    rounds: usize,
}

impl Benchmark {
    /// Harness over a fresh pair of `side` × `side` grids.
    pub fn new(side: usize, rounds: usize) -> Self {
        Self {
            pair: GridPair::new(side),
            rounds,
        }
    }

    /// The standard 512-cell, 100-round measurement.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_GRID_SIZE, DEFAULT_ROUNDS)
    }

    /// Measure one path with no cache maintenance (the software path).
    ///
    /// # Errors
    ///
    /// Propagates filter errors; the pair is reseeded on the next run.
    pub fn run(&mut self, filter: &mut dyn GridFilter) -> Result<BenchReport> {
        self.run_inner(filter, None)
    }

    /// Measure one path with the one-time pre-pass write-back of both
    /// grids (the offload path).
    ///
    /// # Errors
    ///
    /// Propagates filter errors; the pair is reseeded on the next run.
    pub fn run_with_flush(
        &mut self,
        filter: &mut dyn GridFilter,
        cache: &dyn CacheMaintenance,
    ) -> Result<BenchReport> {
        self.run_inner(filter, Some(cache))
    }

    fn run_inner(
        &mut self,
        filter: &mut dyn GridFilter,
        cache: Option<&dyn CacheMaintenance>,
    ) -> Result<BenchReport> {
        let kind = filter.kind();
        tracing::info!("{kind} path: {} rounds starting", self.rounds);

        self.pair.reset();
        let start = Instant::now();

        // Addresses stay constant while roles swap, so one write-back of
        // both grids covers every round.
        let flush = cache.map(|c| {
            for grid in [self.pair.a(), self.pair.b()] {
                let bytes = grid.as_bytes();
                c.flush(bytes.as_ptr() as usize, bytes.len());
            }
            start.elapsed()
        });

        let outcome = run_rounds(filter, &mut self.pair, self.rounds)?;
        let elapsed = start.elapsed();

        let report = self.report(kind, outcome, elapsed, flush);
        tracing::info!(
            "{kind} path finished: checksum {:08x} in {elapsed:?}",
            report.checksum
        );
        Ok(report)
    }

    fn final_grid(&self, slot: Slot) -> &Grid {
        match slot {
            Slot::A => self.pair.a(),
            Slot::B => self.pair.b(),
        }
    }

    fn report(
        &self,
        kind: FilterKind,
        outcome: ScheduleOutcome,
        elapsed: Duration,
        flush: Option<Duration>,
    ) -> BenchReport {
        let grid = self.final_grid(outcome.last_written);
        let rows = PREVIEW_ROWS.min(grid.side());
        let cols = PREVIEW_COLS.min(grid.side());
        let preview = (0..rows).map(|y| grid.row(y)[..cols].to_vec()).collect();

        BenchReport {
            kind,
            rounds_run: outcome.rounds_run,
            final_slot: outcome.last_written,
            checksum: grid.checksum(),
            elapsed,
            flush,
            preview,
        }
    }
}
