//! Split size validator.
//!
//! Recomputes every row count from the manifest's config:
//! - the six core splits from their closed forms, with `train` holding the
//!   unary rows plus the multiary rows not moved to `validation`
//! - longer depths exactly while no down-sampling happened, and as
//!   `max_longer` tables per depth afterwards
//! - every count recorded in the manifest against the file on disk

use lookup_tables::sizes::{expected_longer_sizes, expected_sizes, expected_validation};
use lookup_tables::GenerationConfig;

use crate::report::{ConformanceReport, TestResult};
use crate::validators::{longer_file, DatasetDir};

const VALIDATOR: &str = "sizes";

/// Validates the row counts of `dataset`.
pub fn validate(dataset: &DatasetDir) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let config = &dataset.manifest.config;

    let expected = match expected_sizes(config) {
        Ok(sizes) => sizes,
        Err(e) => {
            report.push(TestResult::fail(
                VALIDATOR,
                format!("Manifest config has no valid sizes: {e}"),
            ));
            return report;
        }
    };
    let validation = expected_validation(config, expected.multiary_train);
    let train = expected.unary + expected.multiary_train - validation;

    let core = [
        ("train.tsv", train),
        ("validation.tsv", validation),
        ("heldout_inputs.tsv", expected.heldout_inputs),
        ("heldout_compositions.tsv", expected.heldout_compositions),
        ("heldout_tables.tsv", expected.heldout_tables),
        ("new_compositions.tsv", expected.new_compositions),
    ];
    for (file, rows) in core {
        check_count(&mut report, dataset, file, rows);
    }

    validate_longer(&mut report, dataset, config);
    validate_manifest_counts(&mut report, dataset);

    if !dataset.manifest.warnings.is_empty() {
        report.push(TestResult::warn_with_details(
            VALIDATOR,
            format!(
                "Dataset was generated with {} warning(s)",
                dataset.manifest.warnings.len()
            ),
            dataset.manifest.warnings.clone(),
        ));
    }

    report
}

/// Checks a file's row count matches the expected value. Missing or
/// malformed files are reported by the files validator.
fn check_count(report: &mut ConformanceReport, dataset: &DatasetDir, file: &str, expected: usize) {
    let Some(rows) = dataset.rows(file) else {
        return;
    };
    if rows.len() == expected {
        report.push(TestResult::pass(
            VALIDATOR,
            format!("Correct {file} row count: {expected}"),
        ));
    } else {
        report.push(TestResult::fail(
            VALIDATOR,
            format!(
                "Wrong {file} row count: expected {expected}, got {}",
                rows.len()
            ),
        ));
    }
}

fn validate_longer(report: &mut ConformanceReport, dataset: &DatasetDir, config: &GenerationConfig) {
    let Ok(domain) = config.domain_size() else {
        return;
    };
    let n = config.n_unary_tables;
    let mut tables = (0..config.max_composition_train).fold(1usize, |acc, _| acc.saturating_mul(n));
    let mut exact = true;

    for index in 1..=config.add_composition_test {
        let depth = config.max_composition_train + index;
        let candidates = tables.saturating_mul(n);
        tables = candidates.min(config.max_longer);
        exact &= candidates <= config.max_longer;

        let files = [
            longer_file("longer_seen", index),
            longer_file("longer_incremental", index),
            longer_file("longer_new", index),
        ];
        if exact {
            let Ok(sizes) = expected_longer_sizes(config, depth) else {
                continue;
            };
            for (file, rows) in files.iter().zip([sizes.seen, sizes.incremental, sizes.new]) {
                check_count(report, dataset, file, rows);
            }
            continue;
        }

        let counts: Option<Vec<usize>> = files
            .iter()
            .map(|f| dataset.rows(f).map(<[_]>::len))
            .collect();
        let Some(counts) = counts else {
            continue;
        };
        let total: usize = counts.iter().sum();
        let expected = tables.saturating_mul(domain);
        if total == expected {
            report.push(TestResult::pass(
                VALIDATOR,
                format!("Down-sampled depth {depth} holds {expected} rows"),
            ));
        } else {
            report.push(TestResult::fail(
                VALIDATOR,
                format!("Down-sampled depth {depth}: expected {expected} rows, got {total}"),
            ));
        }
    }
}

fn validate_manifest_counts(report: &mut ConformanceReport, dataset: &DatasetDir) {
    let mismatches: Vec<String> = dataset
        .manifest
        .files
        .iter()
        .filter_map(|(file, recorded)| {
            let actual = dataset.rows(file)?.len();
            (actual != *recorded).then(|| format!("{file}: manifest {recorded}, file {actual}"))
        })
        .collect();
    if mismatches.is_empty() {
        report.push(TestResult::pass(
            VALIDATOR,
            "Manifest row counts match the split files",
        ));
    } else {
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            format!("{} manifest row count(s) disagree", mismatches.len()),
            mismatches,
        ));
    }
}
