//! Shared setup for the `lookup-*` binaries.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::{Path, PathBuf};

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs a stderr fmt subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr));
    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        tracing::debug!(error = %error, "Tracing subscriber already initialized");
    }
}

/// Output directory of each sample: `dir` itself for a single sample,
/// `dir/sample1`, `dir/sample2`, ... otherwise.
pub fn sample_dirs(dir: &Path, n_samples: usize) -> Vec<PathBuf> {
    if n_samples == 1 {
        return vec![dir.to_path_buf()];
    }
    (1..=n_samples)
        .map(|i| dir.join(format!("sample{i}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_sample_writes_in_place() {
        assert_eq!(sample_dirs(Path::new("data"), 1), [PathBuf::from("data")]);
    }

    #[test]
    fn samples_get_numbered_subdirectories() {
        assert_eq!(
            sample_dirs(Path::new("data"), 2),
            [PathBuf::from("data/sample1"), PathBuf::from("data/sample2")]
        );
    }
}
