//! Core data model: the input domain, lookup tables, and splits.
//!
//! A [`LookupTable`] is immutable once built. Unary tables and composed
//! tables share the type; a composed table's name is the space-separated list
//! of the unary names it was built from, outermost first.

use std::collections::HashMap;

/// Separator between unary-table names inside a composed name.
pub const NAME_DELIMITER: char = ' ';

/// The finite set of inputs every table maps from and to.
///
/// Inputs are all strings of `n_repeats` symbols drawn from the alphabet,
/// enumerated in lexicographic order of the alphabet as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    alphabet: Vec<String>,
    n_repeats: usize,
    inputs: Vec<String>,
}

impl Domain {
    /// Enumerates every input of length `n_repeats` over `alphabet`.
    #[must_use]
    pub fn new(alphabet: &[String], n_repeats: usize) -> Self {
        let mut inputs = vec![String::new()];
        for _ in 0..n_repeats {
            inputs = inputs
                .iter()
                .flat_map(|prefix| alphabet.iter().map(move |symbol| format!("{prefix}{symbol}")))
                .collect();
        }
        Self {
            alphabet: alphabet.to_vec(),
            n_repeats,
            inputs,
        }
    }

    /// Symbols the inputs are made of.
    #[must_use]
    pub fn alphabet(&self) -> &[String] {
        &self.alphabet
    }

    /// Number of symbols per input.
    #[must_use]
    pub fn n_repeats(&self) -> usize {
        self.n_repeats
    }

    /// All inputs in enumeration order.
    #[must_use]
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Number of inputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Returns true if the domain has no inputs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// One row of a table or split.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entry {
    /// Raw domain input, or the formatted key once in a split.
    pub input: String,
    /// Target sequence.
    pub output: String,
}

impl Entry {
    /// Creates an entry.
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Last whitespace-separated token of the output: the final value of a
    /// composition chain.
    #[must_use]
    pub fn final_output(&self) -> &str {
        self.output.split_whitespace().last().unwrap_or("")
    }
}

/// A named, ordered mapping from domain inputs to output sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable {
    name: String,
    entries: Vec<Entry>,
}

impl LookupTable {
    /// Builds a table from its rows.
    pub fn new(name: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Full name, e.g. `"t3 t1"` for `t3 ∘ t1`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unary-table names this table is composed of, outermost first.
    pub fn name_tokens(&self) -> impl Iterator<Item = &str> {
        self.name.split(NAME_DELIMITER).filter(|t| !t.is_empty())
    }

    /// Number of unary tables composed into this one.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.name_tokens().count()
    }

    /// Rows in input order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Output for `input`, if present.
    #[must_use]
    pub fn get(&self, input: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.input == input)
            .map(|e| e.output.as_str())
    }

    /// Index from input to output for repeated lookups.
    #[must_use]
    pub fn index(&self) -> HashMap<&str, &str> {
        self.entries
            .iter()
            .map(|e| (e.input.as_str(), e.output.as_str()))
            .collect()
    }

    /// Splits the rows at the given positions off into a table of the same
    /// name. Returns `(kept, removed)`; both keep the original row order.
    #[must_use]
    pub fn split_off_rows(self, positions: &[usize]) -> (LookupTable, LookupTable) {
        let mut marked = vec![false; self.entries.len()];
        for &p in positions {
            if let Some(slot) = marked.get_mut(p) {
                *slot = true;
            }
        }
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .entries
            .into_iter()
            .zip(marked)
            .partition(|(_, is_removed)| *is_removed);
        (
            LookupTable::new(self.name.clone(), kept.into_iter().map(|(e, _)| e).collect()),
            LookupTable::new(self.name, removed.into_iter().map(|(e, _)| e).collect()),
        )
    }

    /// Consumes the table, returning its rows.
    #[must_use]
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }
}

/// A named collection of formatted rows ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Split {
    /// Split name, e.g. `"heldout_inputs"`.
    pub name: String,
    /// Rows, in output order.
    pub entries: Vec<Entry>,
}

impl Split {
    /// Creates a split.
    pub fn new(name: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the split has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary() -> Vec<String> {
        vec!["0".to_string(), "1".to_string()]
    }

    #[test]
    fn domain_enumeration_order() {
        let domain = Domain::new(&binary(), 2);
        assert_eq!(domain.inputs(), ["00", "01", "10", "11"]);
        assert_eq!(Domain::new(&binary(), 3).len(), 8);
    }

    #[test]
    fn domain_with_multichar_symbols() {
        let alphabet = vec!["a".to_string(), "bc".to_string()];
        let domain = Domain::new(&alphabet, 2);
        assert_eq!(domain.inputs(), ["aa", "abc", "bca", "bcbc"]);
    }

    #[test]
    fn name_tokens_and_depth() {
        let table = LookupTable::new("t3 t1 t2", Vec::new());
        assert_eq!(table.name_tokens().collect::<Vec<_>>(), ["t3", "t1", "t2"]);
        assert_eq!(table.depth(), 3);
    }

    #[test]
    fn final_output_takes_last_token() {
        assert_eq!(Entry::new("00", "10 11").final_output(), "11");
        assert_eq!(Entry::new("00", "01").final_output(), "01");
    }

    #[test]
    fn split_off_rows_moves_without_loss() {
        let table = LookupTable::new(
            "t1",
            vec![
                Entry::new("00", "01"),
                Entry::new("01", "10"),
                Entry::new("10", "11"),
                Entry::new("11", "00"),
            ],
        );
        let (kept, removed) = table.split_off_rows(&[3, 1]);
        assert_eq!(kept.name(), "t1");
        assert_eq!(removed.name(), "t1");
        assert_eq!(kept.entries(), [Entry::new("00", "01"), Entry::new("10", "11")]);
        assert_eq!(removed.entries(), [Entry::new("01", "10"), Entry::new("11", "00")]);
    }
}
