//! Benchmarks for fitting and predicting with the decomposable model.

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trendcast::core::{Cadence, FutureHorizonBuilder, Observation, TrainingSeries};
use trendcast::models::{DecomposableForecastModel, FittedForecaster, Forecaster, UncertaintyMethod};
use trendcast::transform::{SeriesFilter, TemporalAggregator};

fn generate_weekly(n: usize) -> TrainingSeries {
    let base = Utc.with_ymd_and_hms(2015, 1, 4, 0, 0, 0).unwrap();
    let timestamps = (0..n).map(|i| base + Duration::weeks(i as i64)).collect();
    let values = (0..n)
        .map(|i| {
            let t = i as f64;
            500.0 + 2.0 * t + 40.0 * (2.0 * std::f64::consts::PI * t / 52.18).sin() + (i % 7) as f64
        })
        .collect();
    TrainingSeries::new(timestamps, values).unwrap()
}

fn generate_orders(days: i64) -> Vec<Observation> {
    let base = Utc.with_ymd_and_hms(2017, 1, 1, 8, 0, 0).unwrap();
    (0..days * 24)
        .map(|h| Observation::new(base + Duration::hours(h), 10.0 + (h % 13) as f64))
        .collect()
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");

    for size in [52, 104, 260, 520].iter() {
        let series = generate_weekly(*size);
        let model = DecomposableForecastModel::new();

        group.bench_with_input(BenchmarkId::new("Decomposable", size), size, |b, _| {
            b.iter(|| model.fit(black_box(&series)).unwrap())
        });
    }

    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");
    let series = generate_weekly(104);
    let grid = FutureHorizonBuilder::new(Cadence::weekly(), 26)
        .unwrap()
        .build(&series)
        .unwrap();

    let analytic = DecomposableForecastModel::new().fit(&series).unwrap();
    group.bench_function("analytic", |b| b.iter(|| analytic.predict(black_box(&grid))));

    for samples in [100, 1000].iter() {
        let simulated = DecomposableForecastModel::new()
            .with_uncertainty(UncertaintyMethod::Simulated {
                samples: *samples,
                seed: 42,
            })
            .fit(&series)
            .unwrap();
        group.bench_with_input(BenchmarkId::new("simulated", samples), samples, |b, _| {
            b.iter(|| simulated.predict(black_box(&grid)))
        });
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let orders = generate_orders(730);

    c.bench_function("aggregate_and_filter_hourly_orders", |b| {
        let aggregator = TemporalAggregator::new(Cadence::weekly());
        b.iter(|| {
            let points = aggregator.aggregate(black_box(&orders)).unwrap();
            SeriesFilter::new().apply(&points).unwrap()
        })
    });
}

criterion_group!(benches, bench_fit, bench_predict, bench_aggregate);
criterion_main!(benches);
