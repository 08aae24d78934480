//! Unary table generation.
//!
//! Each unary table is a permutation of the domain. Permutations are indexed
//! in lexicographic order of input positions (the order `itertools`-style
//! enumeration would visit them) and `n` distinct indices are drawn without
//! replacement. An index is decoded through the factorial number system, so
//! the permutations never have to be materialized.

use rand::seq::index;
use rand::Rng;

use crate::error::{Error, Result};
use crate::model::{Domain, Entry, LookupTable};

/// Default table namer: `t1`, `t2`, ...
#[must_use]
pub fn default_name(index: usize) -> String {
    format!("t{}", index + 1)
}

/// Number of permutations of `n` items, or `None` if it overflows `usize`.
#[must_use]
pub fn permutation_count(n: usize) -> Option<usize> {
    (1..=n).try_fold(1usize, |acc, k| acc.checked_mul(k))
}

/// Returns the `rank`-th permutation of `items` in lexicographic order of
/// positions. `rank` must be below `items.len()!`.
#[must_use]
pub fn nth_permutation<T: Clone>(items: &[T], rank: usize) -> Vec<T> {
    let mut pool: Vec<T> = items.to_vec();
    let mut out = Vec::with_capacity(items.len());
    let mut rank = rank;
    for remaining in (0..items.len()).rev() {
        let block = permutation_count(remaining).unwrap_or(usize::MAX);
        let pos = (rank / block).min(pool.len().saturating_sub(1));
        rank %= block;
        out.push(pool.remove(pos));
    }
    out
}

/// Draws `n` distinct unary tables over `domain`, named by `namer`.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if `n` exceeds the number of permutations
/// of the domain, or if that number cannot be represented.
pub fn generate_unary_tables<R, F>(
    domain: &Domain,
    n: usize,
    namer: F,
    rng: &mut R,
) -> Result<Vec<LookupTable>>
where
    R: Rng + ?Sized,
    F: Fn(usize) -> String,
{
    let available = permutation_count(domain.len()).ok_or_else(|| {
        Error::config(format!(
            "a {}-input domain has too many permutations to enumerate",
            domain.len()
        ))
    })?;
    if n > available {
        return Err(Error::config(format!(
            "cannot draw {n} distinct tables from {available} permutations"
        )));
    }

    let tables = index::sample(rng, available, n)
        .iter()
        .enumerate()
        .map(|(i, rank)| {
            let outputs = nth_permutation(domain.inputs(), rank);
            let entries = domain
                .inputs()
                .iter()
                .zip(outputs)
                .map(|(input, output)| Entry::new(input.clone(), output))
                .collect();
            LookupTable::new(namer(i), entries)
        })
        .collect();
    Ok(tables)
}
