//! Criterion benchmarks of randomized law checking.

use bochner_fuzz::{AtomShape, FuzzConfig, FuzzRunner, LogScale, Presets, SetFunctionKind};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_point_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_count");

    for points in LogScale::BINARY.values() {
        // 1, 2, 4, ..., 64
        let points = points as u32;
        let config = FuzzConfig::minimal()
            .with_point_count(points)
            .with_max_pieces(points.min(16))
            .with_trials(20)
            .with_seed(42);

        group.throughput(Throughput::Elements(points as u64));
        group.bench_with_input(BenchmarkId::from_parameter(points), &config, |b, config| {
            b.iter_batched(
                || FuzzRunner::new(config.clone()),
                |mut runner| runner.run(),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_atom_shape(c: &mut Criterion) {
    let mut group = c.benchmark_group("atom_shape");

    let shapes = [
        ("singletons", AtomShape::Singletons),
        ("grouped4", AtomShape::Grouped { max_atom_size: 4 }),
        ("trivial", AtomShape::Trivial),
    ];

    for (name, shape) in shapes {
        let config = FuzzConfig::minimal()
            .with_point_count(32)
            .with_atom_shape(shape)
            .with_max_pieces(8)
            .with_trials(20)
            .with_seed(42);

        group.bench_with_input(BenchmarkId::new("shape", name), &config, |b, config| {
            b.iter_batched(
                || FuzzRunner::new(config.clone()),
                |mut runner| runner.run(),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_set_function(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_function");

    let kinds = [
        ("weighted_smul", SetFunctionKind::WeightedSmul),
        ("matrix", SetFunctionKind::Matrix { max_entry: 3.0 }),
        (
            "combination4",
            SetFunctionKind::Combination {
                terms: 4,
                max_entry: 2.0,
            },
        ),
    ];

    for (name, kind) in kinds {
        let config = FuzzConfig::minimal()
            .with_point_count(16)
            .with_set_function(kind)
            .with_trials(20)
            .with_seed(42);

        group.bench_with_input(BenchmarkId::new("kind", name), &config, |b, config| {
            b.iter_batched(
                || FuzzRunner::new(config.clone()),
                |mut runner| runner.run(),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_lipschitz(c: &mut Criterion) {
    let mut group = c.benchmark_group("lipschitz");

    for max_lipschitz in [1.0, 4.0, 16.0] {
        let config = FuzzConfig::minimal()
            .with_lipschitz_checks(2)
            .with_max_lipschitz(max_lipschitz)
            .with_trials(5)
            .with_seed(42);

        group.bench_with_input(
            BenchmarkId::from_parameter(max_lipschitz),
            &config,
            |b, config| {
                b.iter_batched(
                    || FuzzRunner::new(config.clone()),
                    |mut runner| runner.run(),
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_presets(c: &mut Criterion) {
    let mut group = c.benchmark_group("presets");

    // Only benchmark quick presets
    let quick_presets = [
        ("quick", Presets::quick()),
        ("infinite_heavy", Presets::infinite_heavy().with_trials(20)),
    ];

    for (name, config) in quick_presets {
        let config = config.with_seed(42);
        group.bench_with_input(BenchmarkId::new("preset", name), &config, |b, config| {
            b.iter_batched(
                || FuzzRunner::new(config.clone()),
                |mut runner| runner.run(),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_point_count,
    bench_atom_shape,
    bench_set_function,
    bench_lipschitz,
    bench_presets,
);

criterion_main!(benches);
