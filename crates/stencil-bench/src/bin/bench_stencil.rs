// SPDX-License-Identifier: AGPL-3.0-only

//! bench_stencil — software vs offload-engine stencil comparison.
//!
//! Runs the 3×3 averaging benchmark from an identical seed on one or
//! both paths and prints, per path: the top-left 16×8 corner of the
//! final grid, its checksum, and the elapsed wall time. Matching
//! checksums across paths mean the engine computed the same result as
//! the CPU reference.
//!
//! Usage:
//!   cargo run --bin bench_stencil                          # software only
//!   cargo run --bin bench_stencil -- --path both \
//!       --base-addr 0x43c00000                             # plus engine
//!   cargo run --bin bench_stencil -- --rounds 10 --size 64
//!
//! The base address is the platform constant where the engine's AXI
//! register window is decoded; your board support package knows it.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use stencil_driver::{
    AcceleratorFilter, BenchReport, Benchmark, CoherentMemory, MappedRegisters, SoftwareFilter,
    DEFAULT_GRID_SIZE, DEFAULT_ROUNDS,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Path {
    /// CPU reference only.
    Software,
    /// Offload engine only.
    Accelerator,
    /// Reference first, then the engine, for a direct comparison.
    Both,
}

#[derive(Parser)]
#[command(name = "bench_stencil", about = "Stencil filter benchmark", version)]
struct Cli {
    /// Which path(s) to measure.
    #[arg(long, value_enum, default_value = "software")]
    path: Path,

    /// Physical base address of the engine's register window (hex).
    #[arg(long, value_parser = parse_hex)]
    base_addr: Option<usize>,

    /// Grid side length in cells.
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    size: usize,

    /// Filtering rounds per path.
    #[arg(long, default_value_t = DEFAULT_ROUNDS)]
    rounds: usize,
}

fn parse_hex(s: &str) -> std::result::Result<usize, String> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    usize::from_str_radix(digits, 16).map_err(|e| format!("not a hex address: {e}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    println!("== STENCIL ==");
    println!("size = {}, iteration = {}", cli.size, cli.rounds);
    println!();

    let mut bench = Benchmark::new(cli.size, cli.rounds);

    if matches!(cli.path, Path::Software | Path::Both) {
        println!("-- SOFTWARE --");
        let report = bench.run(&mut SoftwareFilter::new())?;
        print_report(&report);
    }

    if matches!(cli.path, Path::Accelerator | Path::Both) {
        let Some(base) = cli.base_addr else {
            bail!("--base-addr is required for the accelerator path");
        };

        println!();
        println!("-- HARDWARE --");
        let regs = MappedRegisters::map(base)
            .with_context(|| format!("mapping register window at {base:#x}"))?;
        let mut filter = AcceleratorFilter::new(regs);
        let report = bench.run_with_flush(&mut filter, &CoherentMemory)?;
        print_report(&report);
        if let Some(flush) = report.flush {
            let us = flush.as_micros();
            println!("(incl. {}.{:03} ms to flush cache)", us / 1000, us % 1000);
        }
    }

    Ok(())
}

fn print_report(report: &BenchReport) {
    for row in &report.preview {
        let line: Vec<String> = row.iter().map(|v| format!("{v:08x}")).collect();
        println!("{}", line.join(" "));
    }
    println!("checksum         : {:08x}", report.checksum);
    let us = report.elapsed.as_micros();
    println!("elapsed time [ms]: {}.{:03}", us / 1000, us % 1000);
}
