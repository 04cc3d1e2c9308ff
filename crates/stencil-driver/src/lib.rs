//! Dual-path stencil filter driver.
//!
//! Runs a fixed-radius 3×3 averaging filter over a square `u32` grid two
//! ways — a pure software reference and a memory-mapped offload engine —
//! under one scheduling and timing harness, so the two paths can be
//! compared by checksum and elapsed time.
//!
//! # Path hierarchy
//!
//! ```text
//! Reference (always available):
//!   SoftwareFilter    — CPU loop, ground truth for the engine's output
//!
//! Offload (needs the mapped register window):
//!   AcceleratorFilter — drives the engine through its AXI handshake
//! ```
//!
//! # Quick start
//!
//! ```no_run
//! use stencil_driver::{Benchmark, SoftwareFilter};
//!
//! # fn main() -> stencil_driver::Result<()> {
//! let mut bench = Benchmark::with_defaults();
//! let report = bench.run(&mut SoftwareFilter::new())?;
//! println!("checksum {:08x} in {:?}", report.checksum, report.elapsed);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod backends;
mod cache;
mod error;
mod filter;
mod grid;
mod harness;
pub mod mmio;
mod schedule;

pub use backends::accelerator::AcceleratorFilter;
pub use backends::software::{SentinelCell, SoftwareFilter};
pub use cache::{CacheMaintenance, CoherentMemory};
pub use error::{Result, StencilError};
pub use filter::{FilterKind, GridFilter};
pub use grid::{Grid, GridPair, SENTINEL_VALUE};
pub use harness::{BenchReport, Benchmark, DEFAULT_GRID_SIZE, DEFAULT_ROUNDS};
pub use mmio::{MappedRegisters, RegisterBlock};
pub use schedule::{run_rounds, ScheduleOutcome, Slot};
