//! Benchmarks for series maintenance
//!
//! Tests the cost of:
//! - Appending readings with running extremes
//! - Replacing the latest timed result
//! - Mean and standard deviation over long series
//!
//! Platform: Cross-platform (synthetic data, CI-safe)

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use livetiming::model::{NumericSeries, TimedResultSeries};
use livetiming::test_utils::timed;
use livetiming::types::Rank;
use std::hint::black_box;

fn readings(count: usize) -> Vec<f64> {
    (0..count).map(|i| 20.0 + (i as f64 * 0.37).sin() * 5.0).collect()
}

fn bench_numeric_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("numeric_series");

    for count in [100usize, 1_000, 10_000] {
        let values = readings(count);

        group.bench_with_input(BenchmarkId::new("add", count), &values, |b, values| {
            b.iter(|| {
                let mut series = NumericSeries::new();
                for value in values {
                    series.add(*value).expect("finite reading");
                }
                black_box(series.range())
            })
        });

        let mut series = NumericSeries::new();
        for value in &values {
            series.add(*value).expect("finite reading");
        }
        group.bench_with_input(BenchmarkId::new("statistics", count), &series, |b, series| {
            b.iter(|| black_box((series.mean(), series.standard_deviation())))
        });
    }

    group.finish();
}

fn bench_timed_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("timed_result_series");

    for laps in [50u32, 500] {
        group.bench_with_input(BenchmarkId::new("add_and_replace", laps), &laps, |b, &laps| {
            b.iter(|| {
                let mut series = TimedResultSeries::new();
                for lap in 1..=laps {
                    series.add(timed(90.0 + f64::from(lap % 7) * 0.1, Rank::Normal, lap));
                    if lap % 10 == 0 {
                        series
                            .replace_last(timed(89.5, Rank::PersonalBest, lap))
                            .expect("series is not empty");
                    }
                }
                black_box((series.minimum(), series.mean()))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_numeric_series, bench_timed_series);
criterion_main!(benches);
