//! Row format validator.
//!
//! For every row of every split file:
//! - the key ends with the eos token when the config sets one
//! - the key names only tables from the manifest roster, and holds exactly
//!   one input from the domain
//! - every target token is a domain input, one per named table when
//!   intermediate outputs are kept and exactly one otherwise

use std::collections::BTreeSet;

use lookup_tables::{Domain, Entry, GenerationConfig};

use crate::report::{ConformanceReport, TestResult};
use crate::validators::{DatasetDir, SplitFile};

const VALIDATOR: &str = "format";

/// Shown per failing file.
const MAX_EXAMPLES: usize = 5;

struct RowRules<'a> {
    config: &'a GenerationConfig,
    inputs: BTreeSet<&'a str>,
    tables: BTreeSet<&'a str>,
}

impl RowRules<'_> {
    fn check(&self, entry: &Entry) -> Option<String> {
        let mut tokens: Vec<&str> = entry.input.split_whitespace().collect();
        if !self.config.eos.is_empty() {
            if tokens.last() != Some(&self.config.eos.as_str()) {
                return Some(format!("key {:?} does not end with {:?}", entry.input, self.config.eos));
            }
            tokens.pop();
        }

        let (inputs, names): (Vec<&str>, Vec<&str>) =
            tokens.iter().partition(|t| self.inputs.contains(*t));
        if inputs.len() != 1 {
            return Some(format!("key {:?} holds {} domain inputs", entry.input, inputs.len()));
        }
        if let Some(unknown) = names.iter().find(|n| !self.tables.contains(*n)) {
            return Some(format!("key {:?} names unknown table {unknown:?}", entry.input));
        }

        let targets: Vec<&str> = entry.output.split_whitespace().collect();
        let width = if self.config.is_intermediate { names.len() } else { 1 };
        if targets.len() != width {
            return Some(format!(
                "target {:?} has {} tokens, expected {width}",
                entry.output,
                targets.len()
            ));
        }
        targets
            .iter()
            .find(|t| !self.inputs.contains(*t))
            .map(|t| format!("target token {t:?} is not a domain input"))
    }
}

/// Validates the format of every parsed row of `dataset`.
pub fn validate(dataset: &DatasetDir) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let manifest = &dataset.manifest;
    let domain = Domain::new(&manifest.config.alphabet, manifest.config.n_repeats);
    let rules = RowRules {
        config: &manifest.config,
        inputs: domain.inputs().iter().map(String::as_str).collect(),
        tables: manifest
            .unary_train
            .iter()
            .chain(&manifest.unary_heldout)
            .map(String::as_str)
            .collect(),
    };

    for (file, state) in &dataset.files {
        let SplitFile::Rows(rows) = state else {
            continue;
        };
        let problems: Vec<String> = rows.iter().filter_map(|e| rules.check(e)).collect();
        if problems.is_empty() {
            report.push(TestResult::pass(
                VALIDATOR,
                format!("All {} rows of {file} are well-formed", rows.len()),
            ));
        } else {
            report.push(TestResult::fail_with_details(
                VALIDATOR,
                format!("{} malformed row(s) in {file}", problems.len()),
                problems.into_iter().take(MAX_EXAMPLES).collect(),
            ));
        }
    }

    report
}
