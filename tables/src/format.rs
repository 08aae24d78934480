//! Input-key formatting.
//!
//! A row `x -> y` of table `"t1 t2"` becomes `"t1 t2 x" -> y`, or
//! `"x t2 t1" -> y` when reversed, followed by the end-of-sequence token if
//! one is set. Only keys change; the set of rows is untouched.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{Entry, LookupTable, Split};

/// How input keys are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Put the input first and the table names in application order.
    pub reverse: bool,
    /// Token appended to every key; empty for none.
    pub eos: String,
}

impl FormatOptions {
    /// Builds options from the generation flags.
    pub fn new(reverse: bool, eos: impl Into<String>) -> Self {
        Self {
            reverse,
            eos: eos.into(),
        }
    }
}

/// Formats the key for `input` of the table named `name`.
#[must_use]
pub fn format_key(name: &str, input: &str, options: &FormatOptions) -> String {
    let forward = format!("{name} {input}");
    let mut key = if options.reverse {
        forward.split_whitespace().rev().collect::<Vec<_>>().join(" ")
    } else {
        forward
    };
    if !options.eos.is_empty() {
        key.push(' ');
        key.push_str(&options.eos);
    }
    key
}

/// Formats every row of `table`.
#[must_use]
pub fn format_table(table: &LookupTable, options: &FormatOptions) -> Vec<Entry> {
    table
        .entries()
        .iter()
        .map(|e| Entry::new(format_key(table.name(), &e.input, options), e.output.clone()))
        .collect()
}

/// Formats and concatenates `tables` into one split, optionally shuffling
/// the merged rows.
pub fn merge_tables<R: Rng + ?Sized>(
    name: impl Into<String>,
    tables: &[LookupTable],
    options: &FormatOptions,
    shuffle: bool,
    rng: &mut R,
) -> Split {
    let mut entries: Vec<Entry> = tables
        .iter()
        .flat_map(|t| format_table(t, options))
        .collect();
    if shuffle {
        entries.shuffle(rng);
    }
    Split::new(name, entries)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn reversed_key_with_eos() {
        let options = FormatOptions::new(true, ".");
        assert_eq!(format_key("t1 t2", "00", &options), "00 t2 t1 .");
    }

    #[test]
    fn forward_key_without_eos() {
        let options = FormatOptions::new(false, "");
        assert_eq!(format_key("t1 t2", "00", &options), "t1 t2 00");
        assert_eq!(format_key("t4", "101", &options), "t4 101");
    }

    #[test]
    fn outputs_are_untouched() {
        let table = LookupTable::new(
            "t1 t2",
            vec![Entry::new("00", "10 11"), Entry::new("01", "00 01")],
        );
        let rows = format_table(&table, &FormatOptions::new(true, "."));
        assert_eq!(
            rows,
            [Entry::new("00 t2 t1 .", "10 11"), Entry::new("01 t2 t1 .", "00 01")]
        );
    }

    #[test]
    fn merge_keeps_every_row() {
        let tables = vec![
            LookupTable::new("t1", vec![Entry::new("0", "1"), Entry::new("1", "0")]),
            LookupTable::new("t2", vec![Entry::new("0", "0"), Entry::new("1", "1")]),
        ];
        let options = FormatOptions::new(true, ".");
        let mut rng = StdRng::seed_from_u64(2);
        let ordered = merge_tables("train", &tables, &options, false, &mut rng);
        let shuffled = merge_tables("train", &tables, &options, true, &mut rng);
        assert_eq!(ordered.name, "train");
        assert_eq!(ordered.entries[0], Entry::new("0 t1 .", "1"));

        let mut a = ordered.entries.clone();
        let mut b = shuffled.entries.clone();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }
}
