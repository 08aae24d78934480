//! Lookup table dataset conformance suite.
//!
//! Re-validates datasets written by `lookup-build` without regenerating
//! them. Every directory holding a `manifest.json` is a dataset; its config
//! is read back from the manifest and the split files are checked against
//! it.
//!
//! # Conformance Scope
//!
//! | Validator | Checks |
//! |-----------|--------|
//! | `files` | file set matches the config, header, two columns per row |
//! | `sizes` | closed-form row counts, manifest row counts |
//! | `leakage` | held-out keys absent from train and validation |
//! | `format` | eos suffix, known table names, target width and tokens |
//!
//! # Entry Point
//!
//! ```no_run
//! use lookup_conformance::run_all;
//!
//! let report = run_all("data".as_ref()).expect("Failed to run conformance");
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod validators;

use std::path::{Path, PathBuf};

use lookup_tables::serializer::manifest::MANIFEST_FILE;
use tracing::debug;
use walkdir::WalkDir;

pub use report::{ConformanceReport, Severity, TestResult};
use validators::DatasetDir;

/// Every directory under `root` (inclusive) that holds a manifest, sorted.
pub fn dataset_dirs(root: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == MANIFEST_FILE)
        .filter_map(|e| e.path().parent().map(Path::to_path_buf))
        .collect();
    dirs.sort();
    dirs
}

/// Runs every validator on one dataset directory.
///
/// # Errors
///
/// Returns an error if the manifest or a split file cannot be read.
pub fn validate_dataset(dir: &Path) -> anyhow::Result<ConformanceReport> {
    let dataset = DatasetDir::load(dir)?;
    let mut report = ConformanceReport::new();
    report.extend(validators::files::validate(&dataset));
    report.extend(validators::sizes::validate(&dataset));
    report.extend(validators::leakage::validate(&dataset));
    report.extend(validators::format::validate(&dataset));
    Ok(report)
}

/// Validates every dataset found under `root`.
///
/// Results are scoped by the dataset's path relative to `root` (`.` for
/// `root` itself). Finding no dataset is a failure.
///
/// # Errors
///
/// Returns an error if a dataset's files cannot be read.
pub fn run_all(root: &Path) -> anyhow::Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let dirs = dataset_dirs(root);
    if dirs.is_empty() {
        report.push(TestResult::fail(
            "discovery",
            format!("No {MANIFEST_FILE} found under {}", root.display()),
        ));
        return Ok(report);
    }

    for dir in dirs {
        let scope = match dir.strip_prefix(root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.display().to_string(),
            _ => ".".to_string(),
        };
        debug!(dataset = %dir.display(), "validating dataset");
        report.extend(validate_dataset(&dir)?.scoped(&scope));
    }
    Ok(report)
}
