//! Validators for one written dataset directory.
//!
//! [`DatasetDir::load`] reads the manifest and every split file once; the
//! validators then only inspect the loaded rows.

pub mod files;
pub mod format;
pub mod leakage;
pub mod sizes;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lookup_tables::serializer::manifest::{Manifest, MANIFEST_FILE};
use lookup_tables::serializer::tsv::{self, HEADER};
use lookup_tables::Entry;

/// The six split files every dataset holds.
pub const CORE_FILES: [&str; 6] = [
    "train.tsv",
    "validation.tsv",
    "heldout_inputs.tsv",
    "heldout_compositions.tsv",
    "heldout_tables.tsv",
    "new_compositions.tsv",
];

/// Longer split kinds, one file per kind and depth.
pub const LONGER_KINDS: [&str; 3] = ["longer_seen", "longer_incremental", "longer_new"];

/// State of one split file on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitFile {
    /// The file does not exist.
    Missing,
    /// The file exists but is not a valid split file.
    Malformed {
        /// 1-based line of the first problem.
        line: usize,
        /// What is wrong with it.
        reason: String,
    },
    /// The parsed rows.
    Rows(Vec<Entry>),
}

/// A dataset directory loaded into memory.
#[derive(Debug, Clone)]
pub struct DatasetDir {
    /// Directory path.
    pub path: PathBuf,
    /// Parsed `manifest.json`.
    pub manifest: Manifest,
    /// Every expected or manifest-listed split file, by file name.
    pub files: BTreeMap<String, SplitFile>,
}

impl DatasetDir {
    /// Reads the manifest and split files of `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or parsed, or if an
    /// existing split file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let manifest_path = path.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
        let manifest = Manifest::from_json(&content)
            .with_context(|| format!("Failed to parse {}", manifest_path.display()))?;

        let mut names: BTreeSet<String> = expected_files(manifest.config.add_composition_test);
        names.extend(manifest.files.keys().cloned());

        let mut files = BTreeMap::new();
        for name in names {
            let file = path.join(&name);
            let state = if file.is_file() {
                let content = std::fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                parse(&content)
            } else {
                SplitFile::Missing
            };
            files.insert(name, state);
        }

        Ok(Self {
            path: path.to_path_buf(),
            manifest,
            files,
        })
    }

    /// Rows of `file`, if it was parsed.
    pub fn rows(&self, file: &str) -> Option<&[Entry]> {
        match self.files.get(file) {
            Some(SplitFile::Rows(rows)) => Some(rows),
            _ => None,
        }
    }
}

/// File names a dataset with `longer_depths` longer depths must contain.
pub fn expected_files(longer_depths: usize) -> BTreeSet<String> {
    let mut names: BTreeSet<String> = CORE_FILES.iter().map(|s| s.to_string()).collect();
    for kind in LONGER_KINDS {
        names.extend((1..=longer_depths).map(|i| longer_file(kind, i)));
    }
    names
}

/// `<kind>_<index>.tsv`, with `index` starting at 1.
pub fn longer_file(kind: &str, index: usize) -> String {
    format!("{kind}_{index}.tsv")
}

fn parse(content: &str) -> SplitFile {
    if let Some(rows) = tsv::parse_tsv(content) {
        return SplitFile::Rows(rows);
    }
    let mut lines = content.lines();
    if lines.next() != Some(HEADER) {
        return SplitFile::Malformed {
            line: 1,
            reason: format!("header is not {HEADER:?}"),
        };
    }
    let (index, columns) = lines
        .enumerate()
        .map(|(i, line)| (i + 2, line.split('\t').count()))
        .find(|(_, columns)| *columns != 2)
        .unwrap_or((0, 0));
    SplitFile::Malformed {
        line: index,
        reason: format!("{columns} columns instead of 2"),
    }
}
