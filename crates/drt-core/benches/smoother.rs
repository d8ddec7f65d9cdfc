//! Criterion benchmarks for the fit/predict hot path in `drt-core`.
//!
//! Inputs are synthetic so the benchmarks run deterministically in CI and on
//! developer machines.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use drt_common::Observation;
use drt_core::config::SmootherConfig;
use drt_core::smoother::{design_point, fit_group, smooth_cohort, DesignPoint};

fn synthetic_series(n: usize) -> Vec<Observation> {
    (0..n)
        .map(|i| {
            let p = 2.0 + 0.1 * i as f64;
            Observation::new(2000 + i as i32, p, p - 0.5, p + 0.5)
        })
        .collect()
}

fn design_points(observations: &[Observation]) -> Vec<DesignPoint> {
    observations
        .iter()
        .map(|obs| design_point(obs, 2000).expect("synthetic observations are valid"))
        .collect()
}

fn bench_fit_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_group");
    for n in [5usize, 15, 30] {
        let points = design_points(&synthetic_series(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
            b.iter(|| fit_group(black_box(points), black_box(&[1.0, 1.0, 100.0])));
        });
    }
    group.finish();
}

fn bench_smooth_cohort(c: &mut Criterion) {
    let observations = synthetic_series(10);
    let target_years: Vec<i32> = (2000..=2020).collect();

    let mut group = c.benchmark_group("smooth_cohort");
    for samples in [1_000usize, 10_000] {
        let config = SmootherConfig {
            n_samples: samples,
            seed: Some(12345),
            ..Default::default()
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(samples),
            &config,
            |b, config| {
                b.iter(|| {
                    smooth_cohort(
                        black_box(&observations),
                        black_box(&target_years),
                        black_box(config),
                    )
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_fit_group, bench_smooth_cohort);
criterion_main!(benches);
