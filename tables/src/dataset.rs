//! End-to-end dataset generation.
//!
//! One seeded [`StdRng`] drives every random choice of a run, so a config
//! always produces the same dataset. Stages, in order: unary tables,
//! compositions up to `max_composition_train`, seen/incremental/new
//! partition, held-out compositions and inputs, longer compositions,
//! formatting, the size invariants, and finally the train/validation split.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::compose::compositions_up_to;
use crate::config::GenerationConfig;
use crate::error::{Result, Warning};
use crate::format::{merge_tables, FormatOptions};
use crate::generator::{default_name, generate_unary_tables};
use crate::heldout::hold_out;
use crate::longer::{self, LongerOptions};
use crate::model::{Domain, LookupTable, Split};
use crate::partition::{partition, TableNames};
use crate::sizes::{self, CoreSizes, LongerSizes};
use crate::stratify::train_validation_split;

/// Upper bound (inclusive) of the per-sample seeds drawn for multi-sample runs.
pub const MAX_SAMPLE_SEED: u64 = 100_000;

/// Every split of one generated dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Unary tables followed by the multiary training rows.
    pub train: Split,
    /// Multiary rows set aside for validation.
    pub validation: Split,
    /// Rows removed from the remaining training compositions.
    pub heldout_inputs: Split,
    /// Seen compositions removed whole from training.
    pub heldout_compositions: Split,
    /// Compositions mixing training and held-out tables.
    pub heldout_tables: Split,
    /// Compositions built only from held-out tables.
    pub new_compositions: Split,
    /// Per-depth seen compositions beyond the training depth.
    pub longer_seen: Vec<Split>,
    /// Per-depth mixed compositions beyond the training depth.
    pub longer_incremental: Vec<Split>,
    /// Per-depth held-out-only compositions beyond the training depth.
    pub longer_new: Vec<Split>,
    /// Names of the unary tables used in training compositions, in draw order.
    pub unary_train: Vec<String>,
    /// Names of the held-out unary tables, in draw order.
    pub unary_heldout: Vec<String>,
    /// Recoverable conditions met while generating.
    pub warnings: Vec<Warning>,
}

impl Dataset {
    /// All splits in output order; longer splits are named `<kind>_<i>`.
    #[must_use]
    pub fn splits(&self) -> Vec<&Split> {
        let mut out = vec![
            &self.train,
            &self.validation,
            &self.heldout_inputs,
            &self.heldout_compositions,
            &self.heldout_tables,
            &self.new_compositions,
        ];
        out.extend(self.longer_seen.iter());
        out.extend(self.longer_incremental.iter());
        out.extend(self.longer_new.iter());
        out
    }
}

/// Generates a dataset with the default `t1`, `t2`, ... table names.
///
/// # Errors
///
/// Returns [`Error::Configuration`](crate::Error::Configuration) for
/// unsatisfiable parameters and
/// [`Error::InvariantViolation`](crate::Error::InvariantViolation) if a split
/// size disagrees with its closed form.
pub fn generate(config: &GenerationConfig) -> Result<Dataset> {
    generate_with_namer(config, default_name)
}

/// Generates a dataset naming unary table `i` with `namer(i)`.
///
/// # Errors
///
/// See [`generate`].
pub fn generate_with_namer<F>(config: &GenerationConfig, namer: F) -> Result<Dataset>
where
    F: Fn(usize) -> String,
{
    config.validate()?;
    let expected = sizes::expected_sizes(config)?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let max_depth = config.max_composition_train;
    let keep_intermediate = config.is_intermediate;

    let domain = Domain::new(&config.alphabet, config.n_repeats);
    let unary = generate_unary_tables(&domain, config.n_unary_tables, namer, &mut rng)?;
    let (train_tables, heldout_tables) = unary.split_at(config.n_train_tables());
    let unary_train: Vec<String> = train_tables.iter().map(|t| t.name().to_string()).collect();
    let unary_heldout: Vec<String> = heldout_tables.iter().map(|t| t.name().to_string()).collect();
    let names = TableNames::new(unary_train.iter().cloned(), unary_heldout.iter().cloned());
    info!(
        inputs = domain.len(),
        train_tables = unary_train.len(),
        heldout_tables = unary_heldout.len(),
        "generated unary tables"
    );

    let multiary = compositions_up_to(&unary, max_depth, keep_intermediate);
    let deepest_start = multiary
        .iter()
        .position(|t| t.depth() == max_depth)
        .unwrap_or(multiary.len());
    let deepest: Vec<LookupTable> = multiary[deepest_start..].to_vec();
    debug!(compositions = multiary.len(), deepest = deepest.len(), "composed tables");

    let grouped = partition(multiary, &names);
    info!(
        seen = grouped.seen.len(),
        incremental = grouped.incremental.len(),
        new = grouped.new.len(),
        "partitioned compositions"
    );
    let held = hold_out(
        grouped.seen,
        config.n_heldout_compositions,
        config.n_heldout_inputs,
        &mut rng,
    )?;

    let longer = longer::extend(
        &unary,
        &deepest,
        max_depth,
        &names,
        LongerOptions {
            steps: config.add_composition_test,
            max_longer: config.max_longer,
            keep_intermediate,
        },
        &mut rng,
    );

    let options = FormatOptions::new(config.is_reverse, config.eos.clone());
    let shuffle = config.is_shuffle;
    let unary_split = merge_tables("unary", &unary, &options, shuffle, &mut rng);
    let multiary_train = merge_tables("multiary_train", &held.train, &options, shuffle, &mut rng);
    let heldout_inputs = merge_tables("heldout_inputs", &held.inputs, &options, shuffle, &mut rng);
    let heldout_compositions = merge_tables(
        "heldout_compositions",
        &held.compositions,
        &options,
        shuffle,
        &mut rng,
    );
    let heldout_tables_split =
        merge_tables("heldout_tables", &grouped.incremental, &options, shuffle, &mut rng);
    let new_compositions =
        merge_tables("new_compositions", &grouped.new, &options, shuffle, &mut rng);

    let longer_seen = merge_depths("longer_seen", &longer.seen, &options, shuffle, &mut rng);
    let longer_incremental =
        merge_depths("longer_incremental", &longer.incremental, &options, shuffle, &mut rng);
    let longer_new = merge_depths("longer_new", &longer.new, &options, shuffle, &mut rng);

    let actual = CoreSizes {
        unary: unary_split.len(),
        multiary_train: multiary_train.len(),
        heldout_inputs: heldout_inputs.len(),
        heldout_compositions: heldout_compositions.len(),
        heldout_tables: heldout_tables_split.len(),
        new_compositions: new_compositions.len(),
    };
    sizes::check_core(&actual, &expected)?;
    for i in 0..longer.exact_depths {
        let actual = LongerSizes {
            seen: longer_seen[i].len(),
            incremental: longer_incremental[i].len(),
            new: longer_new[i].len(),
        };
        sizes::check_longer(config, i, longer.first_depth + i, &actual)?;
    }

    let split = train_validation_split(
        multiary_train.entries,
        &names.train,
        config.validation_size,
        config.is_stratify,
        &mut rng,
    );
    let mut train_rows = unary_split.entries;
    train_rows.extend(split.train);

    let mut warnings = longer.warnings;
    warnings.extend(split.warning);

    let dataset = Dataset {
        train: Split::new("train", train_rows),
        validation: Split::new("validation", split.validation),
        heldout_inputs,
        heldout_compositions,
        heldout_tables: heldout_tables_split,
        new_compositions,
        longer_seen,
        longer_incremental,
        longer_new,
        unary_train,
        unary_heldout,
        warnings,
    };
    info!(
        train = dataset.train.len(),
        validation = dataset.validation.len(),
        warnings = dataset.warnings.len(),
        "generated dataset"
    );
    Ok(dataset)
}

/// One split per depth, named `<kind>_1`, `<kind>_2`, ...
fn merge_depths<R: Rng + ?Sized>(
    kind: &str,
    depths: &[Vec<LookupTable>],
    options: &FormatOptions,
    shuffle: bool,
    rng: &mut R,
) -> Vec<Split> {
    depths
        .iter()
        .enumerate()
        .map(|(i, tables)| merge_tables(format!("{kind}_{}", i + 1), tables, options, shuffle, rng))
        .collect()
}

/// Seeds for `n_samples` independent datasets.
///
/// A single sample uses `seed` itself; several samples draw their seeds in
/// `0..=MAX_SAMPLE_SEED` from a generator seeded with `seed`.
#[must_use]
pub fn sample_seeds(seed: u64, n_samples: usize) -> Vec<u64> {
    if n_samples == 1 {
        return vec![seed];
    }
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_samples)
        .map(|_| rng.gen_range(0..=MAX_SAMPLE_SEED))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tiny() -> GenerationConfig {
        GenerationConfig {
            validation_size: 0.2,
            max_composition_train: 2,
            n_unary_tables: 3,
            n_heldout_tables: 1,
            n_heldout_compositions: 1,
            n_heldout_inputs: 1,
            add_composition_test: 1,
            n_repeats: 2,
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn split_names_and_order() {
        let dataset = generate(&tiny()).unwrap();
        let names: Vec<&str> = dataset.splits().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "train",
                "validation",
                "heldout_inputs",
                "heldout_compositions",
                "heldout_tables",
                "new_compositions",
                "longer_seen_1",
                "longer_incremental_1",
                "longer_new_1",
            ]
        );
        assert_eq!(dataset.unary_train, ["t1", "t2"]);
        assert_eq!(dataset.unary_heldout, ["t3"]);
    }

    #[test]
    fn train_and_validation_cover_multiary_pool() {
        let config = tiny();
        let dataset = generate(&config).unwrap();
        let expected = sizes::expected_sizes(&config).unwrap();
        assert_eq!(
            dataset.train.len() + dataset.validation.len(),
            expected.unary + expected.multiary_train
        );
        assert_eq!(
            dataset.validation.len(),
            sizes::expected_validation(&config, expected.multiary_train)
        );
    }

    #[test]
    fn sample_seeds_are_reproducible() {
        assert_eq!(sample_seeds(123, 1), [123]);
        let seeds = sample_seeds(123, 4);
        assert_eq!(seeds.len(), 4);
        assert_eq!(seeds, sample_seeds(123, 4));
        assert!(seeds.iter().all(|s| *s <= MAX_SAMPLE_SEED));
    }
}
