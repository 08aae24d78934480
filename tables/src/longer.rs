//! Longer-composition test sets.
//!
//! Starting from every table of the deepest training depth, each step
//! prepends every unary table (`u ∘ t` for all `u`, `t`), caps the candidate
//! count at `max_longer` by random down-sampling, and partitions the result.

use rand::seq::index;
use rand::Rng;
use tracing::{debug, warn};

use crate::compose::compose;
use crate::error::Warning;
use crate::model::LookupTable;
use crate::partition::{partition, TableNames};

/// Parameters of [`extend`].
#[derive(Debug, Clone, Copy)]
pub struct LongerOptions {
    /// Number of depths to generate beyond the training bound.
    pub steps: usize,
    /// Cap on tables kept per depth.
    pub max_longer: usize,
    /// Keep intermediate values in the targets.
    pub keep_intermediate: bool,
}

/// Per-depth partitions beyond the training bound.
#[derive(Debug, Clone, Default)]
pub struct Longer {
    /// Depth of the first entry of each list.
    pub first_depth: usize,
    /// `seen[i]`: depth `first_depth + i` tables using no held-out name.
    pub seen: Vec<Vec<LookupTable>>,
    /// `incremental[i]`: tables mixing train and held-out names.
    pub incremental: Vec<Vec<LookupTable>>,
    /// `new[i]`: tables using no training name.
    pub new: Vec<Vec<LookupTable>>,
    /// Number of leading depths that were never down-sampled (at that depth
    /// or any shallower one), whose sizes therefore follow closed forms.
    pub exact_depths: usize,
    /// One warning per down-sampled depth.
    pub warnings: Vec<Warning>,
}

/// Builds the longer test partitions from the deepest training compositions.
///
/// `deepest` must hold the compositions of depth `deepest_depth`.
pub fn extend<R: Rng + ?Sized>(
    unary: &[LookupTable],
    deepest: &[LookupTable],
    deepest_depth: usize,
    names: &TableNames,
    options: LongerOptions,
    rng: &mut R,
) -> Longer {
    let mut out = Longer {
        first_depth: deepest_depth + 1,
        ..Longer::default()
    };
    if options.steps == 0 {
        return out;
    }

    let mut exact = true;
    let mut candidates = prepend_each(unary, deepest, options.keep_intermediate);
    for step in 0..options.steps {
        let depth = out.first_depth + step;
        if candidates.len() > options.max_longer {
            let warning = Warning::LongerDownsampled {
                depth,
                candidates: candidates.len(),
                max_longer: options.max_longer,
            };
            warn!(depth, candidates = candidates.len(), max_longer = options.max_longer, "{warning}");
            out.warnings.push(warning);
            candidates = sample_tables(candidates, options.max_longer, rng);
            exact = false;
        }
        if exact {
            out.exact_depths += 1;
        }

        debug!(depth, tables = candidates.len(), "partitioning longer compositions");
        let is_last = step + 1 == options.steps;
        let next = if is_last {
            Vec::new()
        } else {
            prepend_each(unary, &candidates, options.keep_intermediate)
        };
        let grouped = partition(candidates, names);
        out.seen.push(grouped.seen);
        out.incremental.push(grouped.incremental);
        out.new.push(grouped.new);
        candidates = next;
    }
    out
}

/// `u ∘ t` for every unary `u`, then every `t`.
fn prepend_each(
    unary: &[LookupTable],
    tables: &[LookupTable],
    keep_intermediate: bool,
) -> Vec<LookupTable> {
    unary
        .iter()
        .flat_map(|u| tables.iter().map(move |t| compose(u, t, keep_intermediate)))
        .collect()
}

/// Draws `amount` tables without replacement, in draw order.
fn sample_tables<R: Rng + ?Sized>(
    tables: Vec<LookupTable>,
    amount: usize,
    rng: &mut R,
) -> Vec<LookupTable> {
    let picks = index::sample(rng, tables.len(), amount);
    let mut slots: Vec<Option<LookupTable>> = tables.into_iter().map(Some).collect();
    picks
        .iter()
        .filter_map(|i| slots.get_mut(i).and_then(Option::take))
        .collect()
}
