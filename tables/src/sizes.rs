//! Closed-form split sizes and the invariant checker.
//!
//! With `D` inputs, `n` unary tables of which `h` are held out (`m = n - h`
//! train tables), training depths `2..=c`, `C` held-out compositions and `I`
//! held-out inputs, and `S(k) = Σ_{i=2..=c} k^i · D`:
//!
//! | Split | Rows |
//! |-------|------|
//! | unary tables | `n · D` |
//! | multiary train | `P · (D - I)` where `P = Σ_{i=2..=c} m^i - C` |
//! | heldout_inputs | `P · I` |
//! | heldout_compositions | `C · D` |
//! | heldout_tables | `S(n) - S(m) - S(h)` |
//! | new_compositions | `S(h)` |
//!
//! A longer depth `d` that was never down-sampled holds `m^d · D` seen rows,
//! `h^d · D` new rows, and the rest of `n^d · D` incremental rows.

use crate::config::GenerationConfig;
use crate::error::{Error, Result};

/// Row counts of the six core splits, checked before the validation split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoreSizes {
    /// Formatted unary tables.
    pub unary: usize,
    /// Multiary training rows (train + validation).
    pub multiary_train: usize,
    /// Held-out input rows.
    pub heldout_inputs: usize,
    /// Held-out composition rows.
    pub heldout_compositions: usize,
    /// Rows of compositions mixing train and held-out tables.
    pub heldout_tables: usize,
    /// Rows of compositions built only from held-out tables.
    pub new_compositions: usize,
}

impl CoreSizes {
    /// `(split name, rows)` pairs in report order.
    #[must_use]
    pub fn rows(&self) -> [(&'static str, usize); 6] {
        [
            ("unary", self.unary),
            ("multiary_train", self.multiary_train),
            ("heldout_inputs", self.heldout_inputs),
            ("heldout_compositions", self.heldout_compositions),
            ("heldout_tables", self.heldout_tables),
            ("new_compositions", self.new_compositions),
        ]
    }
}

/// Row counts of one longer depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LongerSizes {
    /// Rows using no held-out table.
    pub seen: usize,
    /// Rows mixing both kinds of table.
    pub incremental: usize,
    /// Rows using no training table.
    pub new: usize,
}

fn overflow() -> Error {
    Error::config("split sizes overflow usize")
}

fn pow(base: usize, exp: usize) -> Result<usize> {
    let exp = u32::try_from(exp).map_err(|_| overflow())?;
    base.checked_pow(exp).ok_or_else(overflow)
}

/// `Σ_{i=2..=max_depth} k^i`.
fn compositions_count(k: usize, max_depth: usize) -> Result<usize> {
    (2..=max_depth).try_fold(0usize, |acc, i| {
        acc.checked_add(pow(k, i)?).ok_or_else(overflow)
    })
}

fn rows(tables: usize, domain: usize) -> Result<usize> {
    tables.checked_mul(domain).ok_or_else(overflow)
}

/// Number of seen compositions before any is held out.
///
/// # Errors
///
/// Returns [`Error::Configuration`] on overflow.
pub fn seen_pool_size(config: &GenerationConfig) -> Result<usize> {
    compositions_count(config.n_train_tables(), config.max_composition_train)
}

/// Expected core split sizes for `config`.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if more compositions are held out than
/// the seen pool holds, or if a size overflows.
pub fn expected_sizes(config: &GenerationConfig) -> Result<CoreSizes> {
    let domain = config.domain_size()?;
    let max = config.max_composition_train;
    let n = config.n_unary_tables;
    let m = config.n_train_tables();
    let h = config.n_heldout_tables;

    let pool = seen_pool_size(config)?;
    let kept = pool.checked_sub(config.n_heldout_compositions).ok_or_else(|| {
        Error::config(format!(
            "n_heldout_compositions={} exceeds the {pool} seen compositions",
            config.n_heldout_compositions
        ))
    })?;
    let kept_inputs = domain.checked_sub(config.n_heldout_inputs).ok_or_else(|| {
        Error::config(format!(
            "n_heldout_inputs={} exceeds the domain size {domain}",
            config.n_heldout_inputs
        ))
    })?;

    let all = rows(compositions_count(n, max)?, domain)?;
    let seen = rows(compositions_count(m, max)?, domain)?;
    let new = rows(compositions_count(h, max)?, domain)?;
    let mixed = all
        .checked_sub(seen)
        .and_then(|r| r.checked_sub(new))
        .ok_or_else(overflow)?;

    Ok(CoreSizes {
        unary: rows(n, domain)?,
        multiary_train: rows(kept, kept_inputs)?,
        heldout_inputs: rows(kept, config.n_heldout_inputs)?,
        heldout_compositions: rows(config.n_heldout_compositions, domain)?,
        heldout_tables: mixed,
        new_compositions: new,
    })
}

/// Expected sizes of longer depth `depth`, assuming no down-sampling.
///
/// # Errors
///
/// Returns [`Error::Configuration`] on overflow.
pub fn expected_longer_sizes(config: &GenerationConfig, depth: usize) -> Result<LongerSizes> {
    let domain = config.domain_size()?;
    let all = rows(pow(config.n_unary_tables, depth)?, domain)?;
    let seen = rows(pow(config.n_train_tables(), depth)?, domain)?;
    let new = rows(pow(config.n_heldout_tables, depth)?, domain)?;
    Ok(LongerSizes {
        seen,
        incremental: all.saturating_sub(seen).saturating_sub(new),
        new,
    })
}

/// Expected validation rows given the multiary training rows.
#[must_use]
pub fn expected_validation(config: &GenerationConfig, multiary_train: usize) -> usize {
    crate::stratify::validation_count(multiary_train, config.validation_size)
}

fn check_one(split: &str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::InvariantViolation {
            split: split.to_string(),
            expected,
            actual,
        })
    }
}

/// Compares actual core sizes with the expected ones.
///
/// # Errors
///
/// Returns [`Error::InvariantViolation`] for the first split that disagrees.
pub fn check_core(actual: &CoreSizes, expected: &CoreSizes) -> Result<()> {
    for ((split, want), (_, got)) in expected.rows().into_iter().zip(actual.rows()) {
        check_one(split, want, got)?;
    }
    Ok(())
}

/// Compares the sizes of longer depth `depth` with their closed forms.
///
/// # Errors
///
/// Returns [`Error::InvariantViolation`] for the first list that disagrees.
pub fn check_longer(
    config: &GenerationConfig,
    index: usize,
    depth: usize,
    actual: &LongerSizes,
) -> Result<()> {
    let expected = expected_longer_sizes(config, depth)?;
    let label = index + 1;
    check_one(&format!("longer_seen_{label}"), expected.seen, actual.seen)?;
    check_one(
        &format!("longer_incremental_{label}"),
        expected.incremental,
        actual.incremental,
    )?;
    check_one(&format!("longer_new_{label}"), expected.new, actual.new)
}
