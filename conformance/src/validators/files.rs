//! Split file validator.
//!
//! Checks that the manifest lists exactly the files a dataset with its
//! `add_composition_test` must hold, and that each of them exists with the
//! `input\toutput` header and two columns per row.

use std::collections::BTreeSet;

use crate::report::{ConformanceReport, TestResult};
use crate::validators::{expected_files, DatasetDir, SplitFile};

const VALIDATOR: &str = "files";

/// Validates the split files of `dataset`.
pub fn validate(dataset: &DatasetDir) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    let expected = expected_files(dataset.manifest.config.add_composition_test);
    let listed: BTreeSet<String> = dataset.manifest.files.keys().cloned().collect();
    if listed == expected {
        report.push(TestResult::pass(
            VALIDATOR,
            format!("Manifest lists the {} expected split files", expected.len()),
        ));
    } else {
        let mut details: Vec<String> = expected
            .difference(&listed)
            .map(|f| format!("not in manifest: {f}"))
            .collect();
        details.extend(listed.difference(&expected).map(|f| format!("unexpected: {f}")));
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            "Manifest file list does not match the config",
            details,
        ));
    }

    let mut problems = Vec::new();
    for (name, state) in &dataset.files {
        match state {
            SplitFile::Missing => problems.push(format!("{name}: missing")),
            SplitFile::Malformed { line, reason } => {
                problems.push(format!("{name}:{line}: {reason}"));
            }
            SplitFile::Rows(_) => {}
        }
    }
    if problems.is_empty() {
        report.push(TestResult::pass(
            VALIDATOR,
            format!("All {} split files are well-formed", dataset.files.len()),
        ));
    } else {
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            format!("{} split file(s) missing or malformed", problems.len()),
            problems,
        ));
    }

    report
}
