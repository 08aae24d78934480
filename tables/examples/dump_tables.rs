//! Demonstrates generating a small lookup-table dataset and printing it.
//!
//! Run with: `cargo run --example dump_tables -p lookup-tables`

use lookup_tables::serializer::tsv;
use lookup_tables::{generate, GenerationConfig};

fn main() {
    let config = GenerationConfig {
        max_composition_train: 2,
        n_unary_tables: 4,
        n_heldout_tables: 1,
        n_heldout_compositions: 2,
        n_heldout_inputs: 1,
        add_composition_test: 1,
        n_repeats: 2,
        ..GenerationConfig::default()
    };

    let dataset = match generate(&config) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("generation failed: {e}");
            std::process::exit(1);
        }
    };

    println!("Lookup tables (seed {})", config.seed);
    println!("  Train tables:    {}", dataset.unary_train.join(" "));
    println!("  Held-out tables: {}", dataset.unary_heldout.join(" "));
    println!();

    for split in dataset.splits() {
        println!("  {:24} {:>5} rows", split.name, split.len());
    }
    for warning in &dataset.warnings {
        println!("  warning: {warning}");
    }

    println!();

    // Show the first lines of the heldout_inputs file.
    let content = tsv::to_tsv(&dataset.heldout_inputs);
    println!("heldout_inputs.tsv ({} bytes):", content.len());
    for line in content.lines().take(6) {
        println!("  {line}");
    }
}
