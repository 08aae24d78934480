//! `lookup-build`: Generates lookup table composition datasets and writes
//! them to disk.
//!
//! **Outputs** (per sample):
//! - `<dir>/train.tsv`, `validation.tsv`, `heldout_inputs.tsv`,
//!   `heldout_compositions.tsv`, `heldout_tables.tsv`, `new_compositions.tsv`
//! - `<dir>/longer_{seen,incremental,new}_<i>.tsv` per longer depth
//! - `<dir>/manifest.json`
//!
//! With `--n-samples k > 1`, sample `i` is written to `<dir>/sample<i>/`.
//!
//! **Usage:**
//! ```
//! lookup-build [--config <file.toml>] [-d <dir>] [-s <n>] [options]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lookup_clients::{init_logging, sample_dirs};
use lookup_tables::serializer::write_dataset;
use lookup_tables::{generate, sample_seeds, GenerationConfig};
use tracing::info;

/// Build lookup table composition datasets.
#[derive(Parser)]
#[command(
    name = "lookup-build",
    about = "Generate lookup table composition datasets"
)]
struct Args {
    /// TOML file with generation options; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory.
    #[arg(short = 'd', long, default_value = "data")]
    dir: PathBuf,

    /// Number of independent datasets to generate.
    #[arg(short = 's', long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    n_samples: u64,

    /// Fraction of multiary training rows moved to validation.
    #[arg(short = 'v', long)]
    validation_size: Option<f64>,

    /// Deepest composition present in training.
    #[arg(short = 'c', long)]
    max_composition_train: Option<usize>,

    /// Number of unary tables.
    #[arg(short = 't', long)]
    n_unary_tables: Option<usize>,

    /// Number of unary tables only seen alone during training.
    #[arg(short = 'T', long)]
    n_heldout_tables: Option<usize>,

    /// Number of compositions removed whole from training.
    #[arg(short = 'C', long)]
    n_heldout_compositions: Option<usize>,

    /// Number of inputs removed from every training composition.
    #[arg(short = 'I', long)]
    n_heldout_inputs: Option<usize>,

    /// Number of longer depths to generate.
    #[arg(short = 'l', long)]
    n_longer: Option<usize>,

    /// Only keep the final value of each composition as target.
    #[arg(long)]
    not_intermediate: bool,

    /// Keep rows in generation order.
    #[arg(long)]
    not_shuffle: bool,

    /// Put table names before the input in keys.
    #[arg(long)]
    not_reverse: bool,

    /// Split train/validation without stratification.
    #[arg(long)]
    not_stratify: bool,

    /// End-of-sequence token appended to keys; empty to disable.
    #[arg(short = 'e', long)]
    eos: Option<String>,

    /// Maximum number of tables kept per longer depth.
    #[arg(short = 'b', long)]
    bound_longer: Option<usize>,

    /// Symbols inputs are built from.
    #[arg(short = 'a', long, num_args = 1..)]
    alphabet: Option<Vec<String>>,

    /// Number of symbols per input.
    #[arg(short = 'r', long)]
    n_repeats: Option<usize>,

    /// Random seed.
    #[arg(short = 'S', long)]
    seed: Option<u64>,
}

impl Args {
    /// Loads `--config` (or the defaults) and applies every flag given.
    fn generation_config(&self) -> Result<GenerationConfig> {
        let mut config = match &self.config {
            Some(path) => GenerationConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => GenerationConfig::default(),
        };

        if let Some(v) = self.validation_size {
            config.validation_size = v;
        }
        if let Some(v) = self.max_composition_train {
            config.max_composition_train = v;
        }
        if let Some(v) = self.n_unary_tables {
            config.n_unary_tables = v;
        }
        if let Some(v) = self.n_heldout_tables {
            config.n_heldout_tables = v;
        }
        if let Some(v) = self.n_heldout_compositions {
            config.n_heldout_compositions = v;
        }
        if let Some(v) = self.n_heldout_inputs {
            config.n_heldout_inputs = v;
        }
        if let Some(v) = self.n_longer {
            config.add_composition_test = v;
        }
        if let Some(v) = self.bound_longer {
            config.max_longer = v;
        }
        if let Some(v) = &self.eos {
            config.eos = v.clone();
        }
        if let Some(v) = &self.alphabet {
            config.alphabet = v.clone();
        }
        if let Some(v) = self.n_repeats {
            config.n_repeats = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
        config.is_intermediate &= !self.not_intermediate;
        config.is_shuffle &= !self.not_shuffle;
        config.is_reverse &= !self.not_reverse;
        config.is_stratify &= !self.not_stratify;

        config.validate().context("Invalid generation options")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let base = args.generation_config()?;

    let n_samples = usize::try_from(args.n_samples).context("Too many samples")?;
    let seeds = sample_seeds(base.seed, n_samples);
    let dirs = sample_dirs(&args.dir, n_samples);

    for (i, (seed, dir)) in seeds.into_iter().zip(dirs).enumerate() {
        let config = GenerationConfig {
            seed,
            ..base.clone()
        };
        println!("Sample {}/{} (seed {seed}) -> {}", i + 1, n_samples, dir.display());
        info!(seed, dir = %dir.display(), "generating sample");

        let dataset = generate(&config)
            .with_context(|| format!("Failed to generate sample with seed {seed}"))?;
        let written = write_dataset(&dataset, &config, &dir)
            .with_context(|| format!("Failed to write dataset to {}", dir.display()))?;
        for (path, split) in written.iter().zip(dataset.splits()) {
            println!("  Written: {} ({} rows)", path.display(), split.len());
        }
        if let Some(manifest) = written.last() {
            println!("  Written: {}", manifest.display());
        }
        for warning in &dataset.warnings {
            println!("  Warning: {warning}");
        }
    }

    println!("Build complete.");
    Ok(())
}
