//! Benchmarks for census operations.
//!
//! This benchmark suite measures:
//! - Triangulation generation at growing sizes
//! - Normalization into a flat gluing table
//! - Combinatorial classification, with and without homology
//! - Homology at thousands of tetrahedra
//! - A small end-to-end sweep

#![allow(missing_docs)] // Allow missing docs for criterion-generated functions

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use manifold_census::{
    CombinatorialClassifier, ManifoldClassifier, SweepConfig, Triangulation, TriangulationParams,
    run_census,
};
use std::hint::black_box;

const SIZES: [(u32, u32, u32); 4] = [(1, 1, 1), (2, 2, 1), (4, 3, 2), (8, 4, 4)];
const LARGE_SIZES: [(u32, u32, u32); 2] = [(1, 100, 100), (1, 400, 400)];

fn tetrahedra(n: u32, s: u32, p: u32) -> u64 {
    u64::from(2 * n * (2 * s + p))
}

/// Benchmark generation including the involution check
fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");

    for (n, s, p) in SIZES {
        group.throughput(Throughput::Elements(tetrahedra(n, s, p)));
        group.bench_with_input(
            BenchmarkId::new("generate", tetrahedra(n, s, p)),
            &TriangulationParams::new(n, s, p, 0, 1),
            |b, &params| {
                b.iter(|| black_box(Triangulation::generate(black_box(params))));
            },
        );
    }
    group.finish();
}

/// Benchmark conversion to flat ids and the gluing table
fn bench_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalization");

    for (n, s, p) in SIZES {
        let Ok(tri) = Triangulation::generate(TriangulationParams::new(n, s, p, 0, 1)) else {
            continue;
        };
        group.throughput(Throughput::Elements(tetrahedra(n, s, p)));
        group.bench_with_input(
            BenchmarkId::new("gluing_table", tetrahedra(n, s, p)),
            &tri,
            |b, tri| {
                b.iter(|| black_box(tri.clone().into_absolute().gluing_table()));
            },
        );
    }
    group.finish();
}

/// Benchmark the combinatorial classifier
fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");

    for (n, s, p) in SIZES {
        let Ok(tri) = Triangulation::generate(TriangulationParams::new(n, s, p, 0, 0)) else {
            continue;
        };
        let table = tri.into_absolute().gluing_table();
        group.throughput(Throughput::Elements(tetrahedra(n, s, p)));

        group.bench_with_input(
            BenchmarkId::new("validity", tetrahedra(n, s, p)),
            &table,
            |b, table| {
                let mut classifier = CombinatorialClassifier::without_homology();
                b.iter(|| black_box(classifier.classify(black_box(table))));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("with_homology", tetrahedra(n, s, p)),
            &table,
            |b, table| {
                let mut classifier = CombinatorialClassifier::new();
                b.iter(|| black_box(classifier.classify(black_box(table))));
            },
        );
    }
    group.finish();
}

/// Benchmark homology on triangulations with thousands of tetrahedra
fn bench_large_homology(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_homology");
    group.sample_size(10);

    for (n, s, p) in LARGE_SIZES {
        let Ok(tri) = Triangulation::generate(TriangulationParams::new(n, s, p, 0, 0)) else {
            continue;
        };
        let table = tri.into_absolute().gluing_table();
        group.throughput(Throughput::Elements(tetrahedra(n, s, p)));
        group.bench_with_input(
            BenchmarkId::new("with_homology", tetrahedra(n, s, p)),
            &table,
            |b, table| {
                let mut classifier = CombinatorialClassifier::new();
                b.iter(|| black_box(classifier.classify(black_box(table))));
            },
        );
    }
    group.finish();
}

/// Benchmark a full sweep without console output
fn bench_sweep(c: &mut Criterion) {
    let config = SweepConfig {
        quiet: true,
        ..SweepConfig::new((1, 2), (2, 3))
    };

    c.bench_function("sweep_small", |b| {
        b.iter(|| {
            let mut classifier = CombinatorialClassifier::new();
            black_box(run_census(&config, &mut classifier, &mut std::io::sink()))
        });
    });
}

criterion_group!(
    benches,
    bench_generation,
    bench_normalization,
    bench_classification,
    bench_large_homology,
    bench_sweep
);
criterion_main!(benches);
