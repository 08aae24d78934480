//! Benchmarks for composition and whole-dataset generation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use lookup_tables::compose::{compose, compositions_up_to};
use lookup_tables::generator::{default_name, generate_unary_tables};
use lookup_tables::{generate, Domain, GenerationConfig};

fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");
    for n_repeats in [3usize, 6, 9] {
        let domain = Domain::new(&["0".to_string(), "1".to_string()], n_repeats);
        let mut rng = StdRng::seed_from_u64(0);
        let Ok(tables) = generate_unary_tables(&domain, 2, default_name, &mut rng) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("pair", domain.len()), &tables, |b, t| {
            b.iter(|| compose(black_box(&t[0]), black_box(&t[1]), true));
        });
    }
    group.finish();
}

fn bench_compositions_up_to(c: &mut Criterion) {
    let domain = Domain::new(&["0".to_string(), "1".to_string()], 3);
    let mut rng = StdRng::seed_from_u64(0);
    let Ok(tables) = generate_unary_tables(&domain, 6, default_name, &mut rng) else {
        return;
    };
    c.bench_function("compositions_up_to/6x4", |b| {
        b.iter(|| compositions_up_to(black_box(&tables), 4, true));
    });
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    group.sample_size(10);
    let small = GenerationConfig {
        max_composition_train: 3,
        n_unary_tables: 6,
        n_heldout_compositions: 10,
        max_longer: 1_000,
        ..GenerationConfig::default()
    };
    group.bench_function("small", |b| b.iter(|| generate(black_box(&small))));
    group.bench_function("default", |b| {
        b.iter(|| generate(black_box(&GenerationConfig::default())))
    });
    group.finish();
}

criterion_group!(benches, bench_compose, bench_compositions_up_to, bench_generate);
criterion_main!(benches);
