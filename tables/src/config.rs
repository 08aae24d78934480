//! Generation parameters.
//!
//! [`GenerationConfig`] can be built in code, loaded from a TOML file with
//! [`GenerationConfig::from_toml_file`], or assembled by the `lookup-build`
//! CLI. Missing keys in a TOML file fall back to [`Default`].
//!
//! ```
//! let config = lookup_tables::GenerationConfig::default();
//! assert_eq!(config.domain_size().ok(), Some(8));
//! assert!(config.validate().is_ok());
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::generator::permutation_count;

/// Every option recognized by the dataset generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Fraction of the multiary training rows moved to the validation split.
    pub validation_size: f64,
    /// Deepest composition present in training.
    pub max_composition_train: usize,
    /// Number of unary tables in the universe.
    pub n_unary_tables: usize,
    /// Number of unary tables only seen alone during training.
    pub n_heldout_tables: usize,
    /// Number of whole compositions removed from training.
    pub n_heldout_compositions: usize,
    /// Number of inputs removed from every remaining training composition.
    pub n_heldout_inputs: usize,
    /// Number of depths beyond `max_composition_train` generated as longer tests.
    pub add_composition_test: usize,
    /// Keep every intermediate value in the target sequence.
    pub is_intermediate: bool,
    /// Shuffle the rows of every written split.
    pub is_shuffle: bool,
    /// Put the input before the table names (`001 t2 t1`) instead of after.
    pub is_reverse: bool,
    /// Balance table membership and depth across train and validation.
    pub is_stratify: bool,
    /// Token appended to every input; empty to disable.
    pub eos: String,
    /// Cap on the number of tables kept per longer depth.
    pub max_longer: usize,
    /// Symbols an input is built from.
    pub alphabet: Vec<String>,
    /// Number of symbols per input.
    pub n_repeats: usize,
    /// Seed for every random choice of the run.
    pub seed: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            validation_size: 0.1,
            max_composition_train: 4,
            n_unary_tables: 8,
            n_heldout_tables: 2,
            n_heldout_compositions: 50,
            n_heldout_inputs: 2,
            add_composition_test: 2,
            is_intermediate: true,
            is_shuffle: true,
            is_reverse: true,
            is_stratify: true,
            eos: ".".to_string(),
            max_longer: 10_000,
            alphabet: vec!["0".to_string(), "1".to_string()],
            n_repeats: 3,
            seed: 123,
        }
    }
}

impl GenerationConfig {
    /// Loads a config from a TOML file. Absent keys take their default value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::ConfigFile`] if it is not a valid config.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::ConfigFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Number of distinct inputs: `|alphabet| ^ n_repeats`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the size overflows `usize`.
    pub fn domain_size(&self) -> Result<usize> {
        let exponent = u32::try_from(self.n_repeats)
            .map_err(|_| Error::config(format!("n_repeats={} is too large", self.n_repeats)))?;
        self.alphabet.len().checked_pow(exponent).ok_or_else(|| {
            Error::config(format!(
                "domain of {}^{} inputs overflows",
                self.alphabet.len(),
                self.n_repeats
            ))
        })
    }

    /// Number of unary tables that may appear inside training compositions.
    #[must_use]
    pub fn n_train_tables(&self) -> usize {
        self.n_unary_tables.saturating_sub(self.n_heldout_tables)
    }

    /// Checks every parameter that can be checked before generation starts.
    ///
    /// Pool-size constraints on held-out compositions are checked by
    /// [`crate::sizes::expected_sizes`], which this calls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] describing the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.alphabet.is_empty() {
            return Err(Error::config("alphabet is empty"));
        }
        let distinct: BTreeSet<&str> = self.alphabet.iter().map(String::as_str).collect();
        if distinct.len() != self.alphabet.len() {
            return Err(Error::config(format!(
                "alphabet {:?} contains duplicate symbols",
                self.alphabet
            )));
        }
        if let Some(bad) = self
            .alphabet
            .iter()
            .find(|s| s.is_empty() || s.chars().any(char::is_whitespace))
        {
            return Err(Error::config(format!(
                "alphabet symbol {bad:?} is empty or contains whitespace"
            )));
        }
        if self.eos.chars().any(char::is_whitespace) {
            return Err(Error::config(format!(
                "eos token {:?} contains whitespace",
                self.eos
            )));
        }
        if self.n_repeats == 0 {
            return Err(Error::config("n_repeats must be at least 1"));
        }
        if self.max_composition_train < 2 {
            return Err(Error::config(format!(
                "max_composition_train={} but compositions need at least 2 tables",
                self.max_composition_train
            )));
        }
        if self.n_heldout_tables > self.n_unary_tables {
            return Err(Error::config(format!(
                "n_heldout_tables={} exceeds n_unary_tables={}",
                self.n_heldout_tables, self.n_unary_tables
            )));
        }
        if !(0.0..1.0).contains(&self.validation_size) {
            return Err(Error::config(format!(
                "validation_size={} must lie in [0, 1)",
                self.validation_size
            )));
        }

        let domain = self.domain_size()?;
        match permutation_count(domain) {
            Some(available) if self.n_unary_tables <= available => {}
            Some(available) => {
                return Err(Error::config(format!(
                    "n_unary_tables={} exceeds the {available} permutations of a {domain}-input domain",
                    self.n_unary_tables
                )))
            }
            None => {
                return Err(Error::config(format!(
                    "a {domain}-input domain has too many permutations to enumerate"
                )))
            }
        }
        if self.n_heldout_inputs > domain {
            return Err(Error::config(format!(
                "n_heldout_inputs={} exceeds the domain size {domain}",
                self.n_heldout_inputs
            )));
        }

        crate::sizes::expected_sizes(self).map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GenerationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.domain_size().ok(), Some(8));
        assert_eq!(config.n_train_tables(), 6);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: GenerationConfig =
            toml::from_str("n_unary_tables = 5\nalphabet = [\"a\", \"b\", \"c\"]\n").unwrap();
        assert_eq!(config.n_unary_tables, 5);
        assert_eq!(config.alphabet.len(), 3);
        assert_eq!(config.eos, ".");
        assert_eq!(config.max_composition_train, 4);
    }

    #[test]
    fn toml_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "seed = 7\nis_reverse = false\n").unwrap();
        let config = GenerationConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.seed, 7);
        assert!(!config.is_reverse);
    }

    #[test]
    fn rejects_too_many_tables_for_domain() {
        let config = GenerationConfig {
            alphabet: vec!["0".into(), "1".into()],
            n_repeats: 1,
            n_unary_tables: 3,
            n_heldout_tables: 1,
            n_heldout_compositions: 0,
            n_heldout_inputs: 0,
            ..GenerationConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn rejects_heldout_inputs_beyond_domain() {
        let config = GenerationConfig {
            n_repeats: 1,
            n_unary_tables: 2,
            n_heldout_tables: 0,
            n_heldout_compositions: 0,
            n_heldout_inputs: 3,
            ..GenerationConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn rejects_duplicate_symbols_and_bad_fraction() {
        let duplicate = GenerationConfig {
            alphabet: vec!["0".into(), "0".into()],
            ..GenerationConfig::default()
        };
        assert!(duplicate.validate().is_err());

        let fraction = GenerationConfig {
            validation_size: 1.0,
            ..GenerationConfig::default()
        };
        assert!(fraction.validate().is_err());
    }

    #[test]
    fn rejects_more_heldout_tables_than_tables() {
        let config = GenerationConfig {
            n_unary_tables: 2,
            n_heldout_tables: 3,
            ..GenerationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
