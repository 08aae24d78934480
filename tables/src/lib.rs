//! Lookup table composition dataset.
//!
//! The `lookup-tables` crate builds a synthetic benchmark for compositional
//! generalization: a universe of random permutation tables over a small
//! string domain, every composition of them up to a training depth, and a
//! family of test splits held out along distinct axes (unseen inputs, unseen
//! compositions, unseen tables, longer compositions).
//!
//! # Entry Point
//!
//! ```
//! use lookup_tables::{generate, GenerationConfig};
//!
//! let config = GenerationConfig {
//!     max_composition_train: 2,
//!     n_unary_tables: 4,
//!     n_heldout_tables: 1,
//!     n_heldout_compositions: 2,
//!     n_heldout_inputs: 1,
//!     add_composition_test: 1,
//!     n_repeats: 2,
//!     ..GenerationConfig::default()
//! };
//! let dataset = generate(&config).unwrap();
//! assert_eq!(dataset.heldout_compositions.len(), 2 * 4);
//! assert_eq!(dataset.longer_seen.len(), 1);
//! ```
//!
//! # Serialization
//!
//! ```no_run
//! # let config = lookup_tables::GenerationConfig::default();
//! let dataset = lookup_tables::generate(&config).unwrap();
//! lookup_tables::serializer::write_dataset(&dataset, &config, "out".as_ref()).unwrap();
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod compose;
pub mod config;
pub mod dataset;
pub mod error;
pub mod format;
pub mod generator;
pub mod heldout;
pub mod longer;
pub mod model;
pub mod partition;
pub mod serializer;
pub mod sizes;
pub mod stratify;

pub use config::GenerationConfig;
pub use dataset::{generate, generate_with_namer, sample_seeds, Dataset};
pub use error::{Error, Result, Warning};
pub use model::{Domain, Entry, LookupTable, Split};
pub use partition::{Novelty, TableNames};
pub use sizes::{CoreSizes, LongerSizes};
