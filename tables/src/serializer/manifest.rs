//! `manifest.json`: what a dataset directory was generated from.
//!
//! The manifest records the effective config (including the per-sample
//! seed), the unary-table roster, the row count of every split file, and the
//! warnings raised while generating. `lookup-conformance` reads it back to
//! recompute the expected sizes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::serializer::tsv;

/// File name of the manifest inside a dataset directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Contents of `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Config the dataset was generated with.
    pub config: GenerationConfig,
    /// Unary tables allowed inside training compositions.
    pub unary_train: Vec<String>,
    /// Unary tables only seen alone during training.
    pub unary_heldout: Vec<String>,
    /// Row count per split file name.
    pub files: BTreeMap<String, usize>,
    /// Warnings raised while generating, as text.
    pub warnings: Vec<String>,
}

impl Manifest {
    /// Describes `dataset`, generated from `config`.
    #[must_use]
    pub fn new(config: &GenerationConfig, dataset: &Dataset) -> Self {
        Self {
            config: config.clone(),
            unary_train: dataset.unary_train.clone(),
            unary_heldout: dataset.unary_heldout.clone(),
            files: dataset
                .splits()
                .into_iter()
                .map(|s| (tsv::file_name(s), s.len()))
                .collect(),
            warnings: dataset.warnings.iter().map(ToString::to_string).collect(),
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Manifest`](crate::Error::Manifest) if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a manifest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Manifest`](crate::Error::Manifest) if `content` is not
    /// a manifest.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Entry, Split};

    #[test]
    fn records_every_file() {
        let dataset = Dataset {
            train: Split::new("train", vec![Entry::new("0 t1 .", "1")]),
            validation: Split::new("validation", Vec::new()),
            longer_seen: vec![Split::new("longer_seen_1", vec![Entry::new("a", "b"); 3])],
            unary_train: vec!["t1".into()],
            unary_heldout: vec!["t2".into()],
            ..Dataset::default()
        };
        let manifest = Manifest::new(&GenerationConfig::default(), &dataset);
        assert_eq!(manifest.files.get("train.tsv"), Some(&1));
        assert_eq!(manifest.files.get("validation.tsv"), Some(&0));
        assert_eq!(manifest.files.get("longer_seen_1.tsv"), Some(&3));

        let json = manifest.to_json().unwrap();
        assert_eq!(Manifest::from_json(&json).unwrap(), manifest);
    }
}
