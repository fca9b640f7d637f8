//! Criterion benchmarks for triangulation construction and refinement.
//!
//! Uses uniformly random point clouds of increasing size to capture scaling of
//! the onion-peel build and the flip passes.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use onion_mwt::Network;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_points(count: usize, seed: u64) -> Vec<[f64; 2]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| [rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)])
        .collect()
}

fn built_network(count: usize, seed: u64) -> Network {
    let mut network = Network::new(random_points(count, seed));
    network.build_triangulation().unwrap();
    network
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_triangulation");
    for &count in &[50usize, 200, 800] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &n| {
            b.iter_batched(
                || Network::new(random_points(n, 17 + n as u64)),
                |mut network| {
                    let _ = black_box(network.build_triangulation().unwrap());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_fine_tune(c: &mut Criterion) {
    let mut group = c.benchmark_group("fine_tune");
    for &count in &[50usize, 200, 800] {
        group.bench_with_input(BenchmarkId::new("quadrilaterals", count), &count, |b, &n| {
            b.iter_batched(
                || built_network(n, 29 + n as u64),
                |mut network| {
                    let _ = black_box(network.fine_tune_quadrilaterals().unwrap());
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("pentagons", count), &count, |b, &n| {
            b.iter_batched(
                || built_network(n, 29 + n as u64),
                |mut network| {
                    let _ = black_box(network.fine_tune_pentagons().unwrap());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_shuffle(c: &mut Criterion) {
    c.bench_function("shuffle_200", |b| {
        b.iter_batched(
            || built_network(200, 5),
            |mut network| {
                let _ = black_box(network.shuffle().unwrap());
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_build, bench_fine_tune, bench_shuffle);
criterion_main!(benches);
