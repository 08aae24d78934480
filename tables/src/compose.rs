//! Table composition.
//!
//! `compose(left, right)` is `left ∘ right`: apply `right`, then look the
//! final value up in `left`. With intermediate outputs kept, the target is
//! `"right(x) left(right(x))"`, so chained compositions expose every step.
//!
//! Each side's name is cut at [`LINEAGE_SEPARATOR`] before joining. Names
//! produced by this crate's default namer never contain it, so the cut only
//! bites on custom namers; see `lineage_cut_pins_current_naming` below.

use crate::model::{Entry, LookupTable, NAME_DELIMITER};

/// Character at which each side's name is truncated when composing.
pub const LINEAGE_SEPARATOR: char = '_';

fn lineage_head(name: &str) -> &str {
    name.split(LINEAGE_SEPARATOR).next().unwrap_or(name)
}

/// Composes `left ∘ right`.
///
/// Rows follow `right`'s order. An input whose intermediate value has no row
/// in `left` is dropped.
#[must_use]
pub fn compose(left: &LookupTable, right: &LookupTable, keep_intermediate: bool) -> LookupTable {
    let lookup = left.index();
    let entries = right
        .entries()
        .iter()
        .filter_map(|row| {
            let step = row.final_output();
            let next = *lookup.get(step)?;
            let output = if keep_intermediate {
                format!("{} {}", row.output, next)
            } else {
                next.to_string()
            };
            Some(Entry::new(row.input.clone(), output))
        })
        .collect();

    let name = format!(
        "{}{}{}",
        lineage_head(left.name()),
        NAME_DELIMITER,
        lineage_head(right.name())
    );
    LookupTable::new(name, entries)
}

/// Composes `tables[0] ∘ tables[1] ∘ ... ∘ tables[k-1]`, folding from the left.
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn compose_chain(tables: &[&LookupTable], keep_intermediate: bool) -> Option<LookupTable> {
    let (first, rest) = tables.split_first()?;
    Some(
        rest.iter()
            .fold((*first).clone(), |acc, next| compose(&acc, next, keep_intermediate)),
    )
}

/// Every composition of `depth` tables drawn (with repetition) from `unary`,
/// in lexicographic order of the index tuple: the first name varies slowest.
///
/// `depth` 0 yields nothing; `depth` 1 yields the unary tables themselves.
#[must_use]
pub fn compositions_of_depth(
    unary: &[LookupTable],
    depth: usize,
    keep_intermediate: bool,
) -> Vec<LookupTable> {
    if depth == 0 {
        return Vec::new();
    }
    let mut level: Vec<LookupTable> = unary.to_vec();
    for _ in 1..depth {
        level = append_each(&level, unary, keep_intermediate);
    }
    level
}

/// All compositions of depth `2..=max_depth`, shallowest first.
#[must_use]
pub fn compositions_up_to(
    unary: &[LookupTable],
    max_depth: usize,
    keep_intermediate: bool,
) -> Vec<LookupTable> {
    let mut all = Vec::new();
    let mut level: Vec<LookupTable> = unary.to_vec();
    for _ in 2..=max_depth {
        level = append_each(&level, unary, keep_intermediate);
        all.extend(level.iter().cloned());
    }
    all
}

/// `prefix ∘ u` for every prefix, then every unary `u`.
fn append_each(
    prefixes: &[LookupTable],
    unary: &[LookupTable],
    keep_intermediate: bool,
) -> Vec<LookupTable> {
    prefixes
        .iter()
        .flat_map(|prefix| {
            unary
                .iter()
                .map(move |last| compose(prefix, last, keep_intermediate))
        })
        .collect()
}
