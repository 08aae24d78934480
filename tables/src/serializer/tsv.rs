//! Tab-separated split files.
//!
//! One header line, then one `input<TAB>output` line per row. Keys and
//! targets are whitespace-separated tokens, so neither ever contains a tab
//! or a newline.

use crate::model::{Entry, Split};

/// Header line of every split file.
pub const HEADER: &str = "input\toutput";

/// File name of a split: `<name>.tsv`.
#[must_use]
pub fn file_name(split: &Split) -> String {
    format!("{}.tsv", split.name)
}

/// Serializes a split to TSV.
#[must_use]
pub fn to_tsv(split: &Split) -> String {
    let width: usize = split
        .entries
        .iter()
        .map(|e| e.input.len() + e.output.len() + 2)
        .sum();
    let mut out = String::with_capacity(HEADER.len() + 1 + width);
    out.push_str(HEADER);
    out.push('\n');
    for entry in &split.entries {
        row(&mut out, entry);
    }
    out
}

fn row(out: &mut String, entry: &Entry) {
    out.push_str(&entry.input);
    out.push('\t');
    out.push_str(&entry.output);
    out.push('\n');
}

/// Parses TSV produced by [`to_tsv`]. Returns `None` on a missing header or
/// a line without exactly two columns.
#[must_use]
pub fn parse_tsv(content: &str) -> Option<Vec<Entry>> {
    let mut lines = content.lines();
    if lines.next()? != HEADER {
        return None;
    }
    lines
        .map(|line| {
            let mut columns = line.split('\t');
            match (columns.next(), columns.next(), columns.next()) {
                (Some(input), Some(output), None) => Some(Entry::new(input, output)),
                _ => None,
            }
        })
        .collect()
}
