//! End-to-end generation scenarios.
//!
//! Every multiary row is re-derived from the unary rows found in `train`, so
//! these tests check composition, formatting, and splitting together.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::{BTreeSet, HashMap};

use lookup_tables::serializer::tsv;
use lookup_tables::{generate, generate_with_namer, Dataset, Error, GenerationConfig, Split, Warning};

// =============================================================================
// Helpers
// =============================================================================

fn small() -> GenerationConfig {
    GenerationConfig {
        validation_size: 0.1,
        max_composition_train: 3,
        n_unary_tables: 4,
        n_heldout_tables: 1,
        n_heldout_compositions: 5,
        n_heldout_inputs: 1,
        add_composition_test: 2,
        n_repeats: 2,
        seed: 42,
        ..GenerationConfig::default()
    }
}

fn keys(split: &Split) -> BTreeSet<&str> {
    split.entries.iter().map(|e| e.input.as_str()).collect()
}

/// Unary mappings recovered from the single-table rows of `train`
/// (reversed keys with eos: `<input> <table> .`).
fn unary_mappings(dataset: &Dataset) -> HashMap<String, HashMap<String, String>> {
    let mut out: HashMap<String, HashMap<String, String>> = HashMap::new();
    for entry in &dataset.train.entries {
        let tokens: Vec<&str> = entry.input.split_whitespace().collect();
        if tokens.len() == 3 {
            out.entry(tokens[1].to_string())
                .or_default()
                .insert(tokens[0].to_string(), entry.output.clone());
        }
    }
    out
}

/// Recomputes the target of a reversed, eos-terminated key.
fn expected_output(
    key: &str,
    unary: &HashMap<String, HashMap<String, String>>,
    intermediate: bool,
) -> String {
    let tokens: Vec<&str> = key.split_whitespace().collect();
    let (input, tables) = (tokens[0], &tokens[1..tokens.len() - 1]);
    let mut value = input.to_string();
    let mut steps = Vec::new();
    for table in tables {
        value = unary[*table][&value].clone();
        steps.push(value.clone());
    }
    if intermediate {
        steps.join(" ")
    } else {
        value
    }
}

fn assert_targets_consistent(dataset: &Dataset, intermediate: bool) {
    let unary = unary_mappings(dataset);
    for split in dataset.splits() {
        for entry in &split.entries {
            assert_eq!(
                entry.output,
                expected_output(&entry.input, &unary, intermediate),
                "wrong target for `{}` in {}",
                entry.input,
                split.name
            );
        }
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn identical_config_gives_identical_files() {
    let a = generate(&small()).unwrap();
    let b = generate(&small()).unwrap();
    let files_a: Vec<String> = a.splits().into_iter().map(tsv::to_tsv).collect();
    let files_b: Vec<String> = b.splits().into_iter().map(tsv::to_tsv).collect();
    assert_eq!(files_a, files_b);
}

#[test]
fn different_seeds_give_different_tables() {
    let a = generate(&small()).unwrap();
    let b = generate(&GenerationConfig { seed: 43, ..small() }).unwrap();
    assert_ne!(tsv::to_tsv(&a.train), tsv::to_tsv(&b.train));
}

#[test]
fn targets_follow_the_unary_tables() {
    let dataset = generate(&small()).unwrap();
    assert_eq!(unary_mappings(&dataset).len(), 4);
    assert_targets_consistent(&dataset, true);
}

#[test]
fn targets_without_intermediate_steps() {
    let config = GenerationConfig {
        is_intermediate: false,
        ..small()
    };
    let dataset = generate(&config).unwrap();
    assert!(dataset
        .splits()
        .iter()
        .flat_map(|s| s.entries.iter())
        .all(|e| e.output.split_whitespace().count() == 1));
    assert_targets_consistent(&dataset, false);
}

#[test]
fn forward_keys_without_eos() {
    let config = GenerationConfig {
        is_reverse: false,
        eos: String::new(),
        ..small()
    };
    let dataset = generate(&config).unwrap();
    for entry in &dataset.heldout_tables.entries {
        let tokens: Vec<&str> = entry.input.split_whitespace().collect();
        assert!(tokens[0].starts_with('t'), "key `{}`", entry.input);
        assert!(tokens.last().unwrap().chars().all(|c| c == '0' || c == '1'));
    }
}

#[test]
fn zero_heldout_counts_keep_the_full_pool() {
    let config = GenerationConfig {
        n_heldout_compositions: 0,
        n_heldout_inputs: 0,
        validation_size: 0.0,
        ..small()
    };
    let dataset = generate(&config).unwrap();
    assert!(dataset.heldout_compositions.is_empty());
    assert!(dataset.heldout_inputs.is_empty());
    assert!(dataset.validation.is_empty());
    // 4 unary tables plus 3^2 + 3^3 seen compositions, 4 rows each
    assert_eq!(dataset.train.len(), (4 + 9 + 27) * 4);
}

#[test]
fn heldout_rows_never_reach_training() {
    let dataset = generate(&small()).unwrap();
    let train = keys(&dataset.train);
    let validation = keys(&dataset.validation);
    for held in [&dataset.heldout_compositions, &dataset.heldout_inputs] {
        let held = keys(held);
        assert!(held.is_disjoint(&train));
        assert!(held.is_disjoint(&validation));
    }
    assert!(train.is_disjoint(&validation));
    assert!(keys(&dataset.heldout_compositions).is_disjoint(&keys(&dataset.heldout_inputs)));
}

#[test]
fn heldout_table_splits_respect_table_roles() {
    let dataset = generate(&small()).unwrap();
    let heldout: BTreeSet<&str> = dataset.unary_heldout.iter().map(String::as_str).collect();
    let names_of = |key: &str| -> BTreeSet<String> {
        let tokens: Vec<&str> = key.split_whitespace().collect();
        tokens[1..tokens.len() - 1].iter().map(|s| s.to_string()).collect()
    };
    for entry in &dataset.heldout_tables.entries {
        let names = names_of(&entry.input);
        assert!(names.iter().any(|n| heldout.contains(n.as_str())));
        assert!(names.iter().any(|n| !heldout.contains(n.as_str())));
    }
    for entry in &dataset.new_compositions.entries {
        assert!(names_of(&entry.input).iter().all(|n| heldout.contains(n.as_str())));
    }
    for entry in dataset.train.entries.iter().chain(&dataset.validation.entries) {
        let names = names_of(&entry.input);
        if names.len() > 1 {
            assert!(names.iter().all(|n| !heldout.contains(n.as_str())));
        }
    }
}

#[test]
fn longer_depths_grow_by_one() {
    let dataset = generate(&small()).unwrap();
    assert_eq!(dataset.longer_seen.len(), 2);
    for (i, split) in dataset.longer_seen.iter().enumerate() {
        let depth = small().max_composition_train + 1 + i;
        for entry in &split.entries {
            // input, `depth` table names, eos
            assert_eq!(entry.input.split_whitespace().count(), depth + 2);
        }
    }
    // 3^4 seen tables at depth 4, 4 rows each
    assert_eq!(dataset.longer_seen[0].len(), 81 * 4);
    assert_eq!(dataset.longer_new[0].len(), 4);
}

#[test]
fn capped_longer_depths_warn_once_each() {
    let config = GenerationConfig {
        max_longer: 50,
        ..small()
    };
    let dataset = generate(&config).unwrap();
    let downsampled: Vec<usize> = dataset
        .warnings
        .iter()
        .filter_map(|w| match w {
            Warning::LongerDownsampled { depth, .. } => Some(*depth),
            Warning::DegenerateStratification { .. } => None,
        })
        .collect();
    assert_eq!(downsampled, [4, 5]);
    for i in 0..2 {
        let rows = dataset.longer_seen[i].len()
            + dataset.longer_incremental[i].len()
            + dataset.longer_new[i].len();
        assert_eq!(rows, 50 * 4);
    }
}

#[test]
fn tiny_validation_falls_back_to_unstratified() {
    let config = GenerationConfig {
        max_composition_train: 2,
        n_unary_tables: 3,
        n_heldout_tables: 1,
        n_heldout_compositions: 1,
        n_heldout_inputs: 1,
        add_composition_test: 0,
        validation_size: 0.1,
        ..small()
    };
    // 9 multiary rows in at least two strata, one validation slot
    let dataset = generate(&config).unwrap();
    assert!(dataset
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::DegenerateStratification { .. })));
    assert_eq!(dataset.validation.len(), 1);
    assert_eq!(dataset.train.len(), 3 * 4 + 8);
}

#[test]
fn unstratified_split_has_no_warning() {
    let config = GenerationConfig {
        is_stratify: false,
        ..small()
    };
    let dataset = generate(&config).unwrap();
    assert!(dataset.warnings.is_empty());
}

#[test]
fn underscored_names_break_the_size_invariants() {
    // Names are cut at `_` when composed, so `t_1 ∘ t_2` is named `t t`,
    // which belongs to neither name set.
    let err = generate_with_namer(&small(), |i| format!("t_{}", i + 1)).unwrap_err();
    assert!(matches!(err, Error::InvariantViolation { .. }), "{err}");
}

#[test]
fn impossible_configs_are_rejected() {
    let too_many_tables = GenerationConfig {
        n_repeats: 1,
        n_unary_tables: 3,
        ..small()
    };
    assert!(matches!(
        generate(&too_many_tables),
        Err(Error::Configuration(_))
    ));

    let too_many_compositions = GenerationConfig {
        n_heldout_compositions: 1_000,
        ..small()
    };
    assert!(matches!(
        generate(&too_many_compositions),
        Err(Error::Configuration(_))
    ));
}
