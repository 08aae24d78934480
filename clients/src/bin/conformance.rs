//! `lookup-conformance`: Validates written lookup table datasets.
//!
//! Every directory under `--dir` holding a `manifest.json` is checked:
//! - split files (presence, header, two columns per row)
//! - row counts (closed-form sizes, manifest counts)
//! - leakage (held-out keys absent from train and validation)
//! - row format (eos, table names, target width)
//!
//! **Usage:**
//! ```
//! lookup-conformance [--dir <path>]
//! ```
//!
//! Exits non-zero if any conformance check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use lookup_clients::init_logging;
use lookup_conformance::{run_all, Severity};

/// Run the lookup table dataset conformance suite.
#[derive(Parser)]
#[command(
    name = "lookup-conformance",
    about = "Validate written lookup table datasets"
)]
struct Args {
    /// Dataset directory, or a parent of several sample directories.
    #[arg(short = 'd', long, default_value = "data")]
    dir: PathBuf,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let report = run_all(&args.dir)?;

    println!("Lookup Tables Conformance Report");
    println!("================================");
    println!();

    for result in &report.results {
        let status = match result.severity {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        };
        println!("[{}] {} - {}", status, result.validator, result.message);
        for detail in &result.details {
            println!("       {}", detail);
        }
    }

    let failed = report.failure_count();
    println!();
    println!(
        "Summary: {} passed, {} warnings, {} failed",
        report.count(&Severity::Pass),
        report.count(&Severity::Warning),
        failed
    );

    if failed > 0 {
        eprintln!("Conformance FAILED: {} check(s) did not pass.", failed);
        process::exit(1);
    }

    println!("Conformance PASSED.");
    Ok(())
}
