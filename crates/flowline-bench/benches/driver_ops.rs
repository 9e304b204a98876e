//! Criterion benchmarks for full driver updates.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use flowline_bench::{reference_config, reference_registry, reference_timestamps};
use flowline_engine::FlowDriver;

/// Benchmark: seed, advect 100 steps, and color 512 streams from scratch.
fn bench_cold_update(c: &mut Criterion) {
    let cfg = reference_config(8, 100);
    c.bench_function("cold_update_512x100", |b| {
        b.iter_batched(
            || FlowDriver::new(reference_registry(), reference_timestamps()).unwrap(),
            |mut driver| {
                driver.update(&cfg).unwrap();
                black_box(driver)
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: extend 512 streams from 50 to 100 steps.
fn bench_extend_update(c: &mut Criterion) {
    let short = reference_config(8, 50);
    let long = reference_config(8, 100);
    c.bench_function("extend_update_512_50_to_100", |b| {
        b.iter_batched(
            || {
                let mut driver =
                    FlowDriver::new(reference_registry(), reference_timestamps()).unwrap();
                driver.update(&short).unwrap();
                driver
            },
            |mut driver| {
                driver.update(&long).unwrap();
                black_box(driver)
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: split 512 streams into polylines.
fn bench_polylines(c: &mut Criterion) {
    let mut driver = FlowDriver::new(reference_registry(), reference_timestamps()).unwrap();
    driver.update(&reference_config(8, 100)).unwrap();
    c.bench_function("polylines_512x100", |b| {
        b.iter(|| black_box(driver.polylines()));
    });
}

criterion_group!(benches, bench_cold_update, bench_extend_update, bench_polylines);
criterion_main!(benches);
