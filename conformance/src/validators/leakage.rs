//! Leakage validator.
//!
//! Held-out keys must never be trainable: no key of `heldout_compositions`
//! or `heldout_inputs` may appear in `train` or `validation`, and the two
//! training-side files must not share a key either.

use std::collections::BTreeSet;

use crate::report::{ConformanceReport, TestResult};
use crate::validators::DatasetDir;

const VALIDATOR: &str = "leakage";

/// Shown per failure.
const MAX_EXAMPLES: usize = 5;

fn keys<'a>(dataset: &'a DatasetDir, file: &str) -> BTreeSet<&'a str> {
    dataset
        .rows(file)
        .unwrap_or_default()
        .iter()
        .map(|e| e.input.as_str())
        .collect()
}

/// Validates that held-out keys stay out of the training files.
pub fn validate(dataset: &DatasetDir) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let train = keys(dataset, "train.tsv");
    let validation = keys(dataset, "validation.tsv");

    let pairs = [
        ("heldout_compositions.tsv", "train.tsv", &train),
        ("heldout_compositions.tsv", "validation.tsv", &validation),
        ("heldout_inputs.tsv", "train.tsv", &train),
        ("heldout_inputs.tsv", "validation.tsv", &validation),
        ("validation.tsv", "train.tsv", &train),
    ];
    for (held, seen, seen_keys) in pairs {
        let shared: Vec<&str> = keys(dataset, held)
            .intersection(seen_keys)
            .copied()
            .collect();
        if shared.is_empty() {
            report.push(TestResult::pass(
                VALIDATOR,
                format!("No {held} key appears in {seen}"),
            ));
        } else {
            report.push(TestResult::fail_with_details(
                VALIDATOR,
                format!("{} {held} key(s) appear in {seen}", shared.len()),
                shared
                    .iter()
                    .take(MAX_EXAMPLES)
                    .map(|k| k.to_string())
                    .collect(),
            ));
        }
    }

    report
}
