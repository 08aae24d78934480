//! Seen / incremental / new classification of composed tables.
//!
//! A composed table is classified by which unary names occur among its name
//! tokens:
//!
//! | Class | Tokens in train names | Tokens in held-out names |
//! |-------|----------------------|--------------------------|
//! | **Seen** | some | none |
//! | **Incremental** | some | some |
//! | **New** | none | some |
//! | **Unattributed** | none | none |
//!
//! Grouping puts an unattributed table in both the seen and the new list.
//! When the two name sets cover every token (always the case for names built
//! by the default namer), the three lists are disjoint and their lengths sum
//! to the input length.

use std::collections::BTreeSet;

use crate::model::LookupTable;

/// The unary-table universe split into training and held-out names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableNames {
    /// Names that may appear inside training compositions.
    pub train: BTreeSet<String>,
    /// Names only ever seen alone during training.
    pub heldout: BTreeSet<String>,
}

impl TableNames {
    /// Builds the name sets from two lists of names.
    pub fn new<I, J>(train: I, heldout: J) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        J: IntoIterator,
        J::Item: Into<String>,
    {
        Self {
            train: train.into_iter().map(Into::into).collect(),
            heldout: heldout.into_iter().map(Into::into).collect(),
        }
    }
}

/// Classification of one composed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Novelty {
    /// Built only from training tables.
    Seen,
    /// Mixes training and held-out tables.
    Incremental,
    /// Built only from held-out tables.
    New,
    /// No token belongs to either name set.
    Unattributed,
}

/// Classifies `table` against `names`.
#[must_use]
pub fn classify(table: &LookupTable, names: &TableNames) -> Novelty {
    let mut uses_train = false;
    let mut uses_heldout = false;
    for token in table.name_tokens() {
        uses_train |= names.train.contains(token);
        uses_heldout |= names.heldout.contains(token);
    }
    match (uses_train, uses_heldout) {
        (true, false) => Novelty::Seen,
        (true, true) => Novelty::Incremental,
        (false, true) => Novelty::New,
        (false, false) => Novelty::Unattributed,
    }
}

/// Tables grouped by [`Novelty`]. Each list keeps the input order.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    /// Tables using no held-out name.
    pub seen: Vec<LookupTable>,
    /// Tables using both kinds of names.
    pub incremental: Vec<LookupTable>,
    /// Tables using no training name.
    pub new: Vec<LookupTable>,
}

impl Partition {
    /// Total number of tables across the three lists.
    #[must_use]
    pub fn table_count(&self) -> usize {
        self.seen.len() + self.incremental.len() + self.new.len()
    }
}

/// Classifies every table in one pass and groups them.
#[must_use]
pub fn partition(tables: Vec<LookupTable>, names: &TableNames) -> Partition {
    let mut out = Partition::default();
    for table in tables {
        match classify(&table, names) {
            Novelty::Seen => out.seen.push(table),
            Novelty::Incremental => out.incremental.push(table),
            Novelty::New => out.new.push(table),
            Novelty::Unattributed => {
                out.seen.push(table.clone());
                out.new.push(table);
            }
        }
    }
    out
}
