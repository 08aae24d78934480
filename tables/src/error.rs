//! Error and warning types for dataset generation.
//!
//! Errors are fatal: a configuration that cannot be satisfied, or split sizes
//! that disagree with their closed-form counts. Warnings are recoverable and
//! are collected on the generated [`Dataset`](crate::Dataset) as well as
//! emitted through `tracing`.

use std::fmt;
use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal generation errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested parameters cannot be satisfied.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A split size disagrees with its closed-form count.
    #[error("invariant violated for `{split}`: expected {expected} rows, got {actual}")]
    InvariantViolation {
        /// Name of the offending split.
        split: String,
        /// Size derived from the generation parameters.
        expected: usize,
        /// Size actually produced.
        actual: usize,
    },

    /// A dataset file could not be written or read.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML for [`GenerationConfig`](crate::GenerationConfig).
    #[error("failed to parse config {}: {source}", path.display())]
    ConfigFile {
        /// Config file path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// The manifest could not be encoded.
    #[error("failed to encode manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }
}

/// Recoverable conditions met during generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The train/validation split could not honor stratification and fell
    /// back to a plain shuffled split.
    DegenerateStratification {
        /// Number of strata found.
        classes: usize,
        /// Size of the least populated stratum.
        smallest_class: usize,
        /// Requested number of validation rows.
        validation: usize,
    },
    /// A longer-composition depth produced more tables than `max_longer` and
    /// was randomly down-sampled.
    LongerDownsampled {
        /// Composition depth of the candidates.
        depth: usize,
        /// Number of candidate tables before down-sampling.
        candidates: usize,
        /// Number kept.
        max_longer: usize,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DegenerateStratification {
                classes,
                smallest_class,
                validation,
            } => write!(
                f,
                "stratified split impossible ({classes} classes, smallest has {smallest_class} \
                 rows, {validation} validation rows requested); using an unstratified split"
            ),
            Warning::LongerDownsampled {
                depth,
                candidates,
                max_longer,
            } => write!(
                f,
                "randomly selecting {max_longer} of {candidates} tables of depth {depth} \
                 (max_longer exceeded)"
            ),
        }
    }
}
