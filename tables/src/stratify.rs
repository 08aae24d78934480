//! Train/validation split of the multiary training rows.
//!
//! The validation split takes `ceil(validation_size * n)` rows. With
//! stratification, rows are grouped by the training tables named in their
//! key and by key length, and each group contributes in proportion to its
//! size. Stratification is impossible when a group has a single row or when
//! either side would hold fewer rows than there are groups; the split then
//! falls back to an unstratified shuffle and reports a
//! [`Warning::DegenerateStratification`].

use std::collections::{BTreeMap, BTreeSet};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::error::Warning;
use crate::model::Entry;

/// Group key: membership flag per training table (in name order), then
/// token count.
type Stratum = (Vec<bool>, usize);

fn stratum(entry: &Entry, train_names: &BTreeSet<String>) -> Stratum {
    let tokens: Vec<&str> = entry.input.split_whitespace().collect();
    let membership = train_names
        .iter()
        .map(|name| tokens.contains(&name.as_str()))
        .collect();
    (membership, tokens.len())
}

/// Outcome of [`train_validation_split`].
#[derive(Debug, Clone, Default)]
pub struct TrainValidation {
    /// Rows kept for training.
    pub train: Vec<Entry>,
    /// Rows moved to validation.
    pub validation: Vec<Entry>,
    /// Set when stratification had to be abandoned.
    pub warning: Option<Warning>,
}

/// Number of validation rows for `n` rows.
#[must_use]
pub fn validation_count(n: usize, validation_size: f64) -> usize {
    let wanted = (validation_size * n as f64).ceil();
    if wanted <= 0.0 {
        0
    } else {
        (wanted as usize).min(n)
    }
}

/// Splits `entries` into training and validation rows.
pub fn train_validation_split<R: Rng + ?Sized>(
    entries: Vec<Entry>,
    train_names: &BTreeSet<String>,
    validation_size: f64,
    stratify: bool,
    rng: &mut R,
) -> TrainValidation {
    let n_validation = validation_count(entries.len(), validation_size);
    if n_validation == 0 {
        return TrainValidation {
            train: entries,
            ..TrainValidation::default()
        };
    }

    if !stratify {
        return shuffle_split(entries, n_validation, None, rng);
    }

    let mut groups: BTreeMap<Stratum, Vec<Entry>> = BTreeMap::new();
    for entry in entries {
        groups
            .entry(stratum(&entry, train_names))
            .or_default()
            .push(entry);
    }

    let n = groups.values().map(Vec::len).sum::<usize>();
    let classes = groups.len();
    let smallest_class = groups.values().map(Vec::len).min().unwrap_or(0);
    if smallest_class < 2 || n_validation < classes || n - n_validation < classes {
        let warning = Warning::DegenerateStratification {
            classes,
            smallest_class,
            validation: n_validation,
        };
        warn!(classes, smallest_class, validation = n_validation, "{warning}");
        let entries = groups.into_values().flatten().collect();
        return shuffle_split(entries, n_validation, Some(warning), rng);
    }

    let quotas = proportional_quotas(
        &groups.values().map(Vec::len).collect::<Vec<_>>(),
        n_validation,
    );
    let mut train = Vec::with_capacity(n - n_validation);
    let mut validation = Vec::with_capacity(n_validation);
    for (mut members, quota) in groups.into_values().zip(quotas) {
        members.shuffle(rng);
        let rest = members.split_off(quota);
        validation.extend(members);
        train.extend(rest);
    }
    train.shuffle(rng);
    validation.shuffle(rng);
    TrainValidation {
        train,
        validation,
        warning: None,
    }
}

/// Splits `total` slots across groups proportionally to `sizes`: floors
/// first, then one extra slot per group by largest remainder (earlier group
/// wins ties).
fn proportional_quotas(sizes: &[usize], total: usize) -> Vec<usize> {
    let n: usize = sizes.iter().sum();
    if n == 0 {
        return vec![0; sizes.len()];
    }
    let mut quotas: Vec<usize> = sizes.iter().map(|s| s * total / n).collect();
    let assigned: usize = quotas.iter().sum();

    let mut order: Vec<usize> = (0..sizes.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(sizes[i] * total % n));
    for &i in order.iter().take(total.saturating_sub(assigned)) {
        quotas[i] += 1;
    }
    quotas
}

fn shuffle_split<R: Rng + ?Sized>(
    mut entries: Vec<Entry>,
    n_validation: usize,
    warning: Option<Warning>,
    rng: &mut R,
) -> TrainValidation {
    entries.shuffle(rng);
    let train = entries.split_off(n_validation);
    TrainValidation {
        train,
        validation: entries,
        warning,
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn names() -> BTreeSet<String> {
        ["t1", "t2"].iter().map(|s| s.to_string()).collect()
    }

    fn rows(key: &str, count: usize) -> Vec<Entry> {
        (0..count)
            .map(|i| Entry::new(format!("{i:03} {key} ."), "x"))
            .collect()
    }

    #[test]
    fn validation_count_rounds_up() {
        assert_eq!(validation_count(100, 0.1), 10);
        assert_eq!(validation_count(101, 0.1), 11);
        assert_eq!(validation_count(5, 0.0), 0);
    }

    #[test]
    fn quotas_sum_to_total() {
        assert_eq!(proportional_quotas(&[50, 30, 20], 10), [5, 3, 2]);
        let quotas = proportional_quotas(&[7, 7, 7], 4);
        assert_eq!(quotas.iter().sum::<usize>(), 4);
        assert_eq!(quotas, [2, 1, 1]);
    }

    #[test]
    fn stratified_split_balances_groups() {
        let mut entries = rows("t1 t1", 40);
        entries.extend(rows("t1 t2", 40));
        entries.extend(rows("t2 t2 t1", 20));
        let mut rng = StdRng::seed_from_u64(4);
        let split = train_validation_split(entries, &names(), 0.1, true, &mut rng);

        assert!(split.warning.is_none());
        assert_eq!(split.validation.len(), 10);
        assert_eq!(split.train.len(), 90);
        let count = |key: &str| {
            split
                .validation
                .iter()
                .filter(|e| e.input.contains(key))
                .count()
        };
        assert_eq!(count("t1 t1"), 4);
        assert_eq!(count("t1 t2"), 4);
        assert_eq!(count("t2 t2 t1"), 2);
    }

    #[test]
    fn singleton_group_falls_back_with_warning() {
        let mut entries = rows("t1 t1", 30);
        entries.extend(rows("t2 t2", 1));
        let mut rng = StdRng::seed_from_u64(4);
        let split = train_validation_split(entries, &names(), 0.2, true, &mut rng);

        assert_eq!(
            split.warning,
            Some(Warning::DegenerateStratification {
                classes: 2,
                smallest_class: 1,
                validation: 7
            })
        );
        assert_eq!(split.validation.len(), 7);
        assert_eq!(split.train.len(), 24);
    }

    #[test]
    fn unstratified_split_never_warns() {
        let entries = rows("t1 t2", 3);
        let mut rng = StdRng::seed_from_u64(1);
        let split = train_validation_split(entries, &names(), 0.5, false, &mut rng);
        assert!(split.warning.is_none());
        assert_eq!(split.validation.len(), 2);
        assert_eq!(split.train.len(), 1);
    }

    #[test]
    fn zero_fraction_keeps_everything() {
        let entries = rows("t1 t2", 3);
        let mut rng = StdRng::seed_from_u64(1);
        let split = train_validation_split(entries.clone(), &names(), 0.0, true, &mut rng);
        assert_eq!(split.train, entries);
        assert!(split.validation.is_empty());
    }
}
