//! Writers for generated datasets.
//!
//! A dataset directory holds one file per split:
//! - **TSV** ([`tsv`]): `<split>.tsv` for the six core splits plus
//!   `longer_<kind>_<depth>.tsv` per longer depth
//! - **Manifest** ([`manifest`]): `manifest.json` describing the run

pub mod manifest;
pub mod tsv;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::GenerationConfig;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use manifest::{Manifest, MANIFEST_FILE};

fn write(path: PathBuf, content: &str) -> Result<PathBuf> {
    fs::write(&path, content).map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Writes every split of `dataset` and its manifest into `dir`, creating the
/// directory if needed. Returns the written paths, manifest last.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory or a file cannot be written.
pub fn write_dataset(dataset: &Dataset, config: &GenerationConfig, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    for split in dataset.splits() {
        written.push(write(dir.join(tsv::file_name(split)), &tsv::to_tsv(split))?);
    }
    let manifest = Manifest::new(config, dataset).to_json()?;
    written.push(write(dir.join(MANIFEST_FILE), &manifest)?);
    Ok(written)
}
