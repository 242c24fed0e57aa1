//! Criterion benchmarks for the staging engine.

#![allow(clippy::unwrap_used)]

use chrono::{Days, NaiveDate, NaiveTime};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use muster_core::{AnimalSnapshot, LifecycleConfig, Sex, classify_on, simulate};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

fn herd(size: u64) -> Vec<AnimalSnapshot> {
    (0..size)
        .map(|i| AnimalSnapshot {
            birth_date: reference().checked_sub_days(Days::new(i % 1400 + 1)),
            sex: if i % 2 == 0 { Sex::Female } else { Sex::Male },
            pregnancy_days: if i % 7 == 0 { (i % 280) as u32 } else { 0 },
            ..AnimalSnapshot::default()
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    let config = LifecycleConfig::default();
    let snapshots = herd(1000);

    c.bench_function("classify_1000_records", |b| {
        b.iter(|| {
            for snapshot in &snapshots {
                black_box(classify_on(black_box(snapshot), reference(), &config));
            }
        });
    });
}

fn bench_simulate_one_year(c: &mut Criterion) {
    let config = LifecycleConfig::default();
    let snapshot = AnimalSnapshot {
        sex: Sex::Female,
        ..AnimalSnapshot::default()
    };
    let start = reference();
    let end = start.checked_add_days(Days::new(365)).unwrap();

    c.bench_function("simulate_one_year_daily", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            black_box(
                simulate(
                    black_box(&snapshot),
                    start,
                    end,
                    start.and_time(NaiveTime::MIN),
                    &config,
                    &mut rng,
                )
                .unwrap(),
            )
        });
    });
}

criterion_group!(benches, bench_classify, bench_simulate_one_year);
criterion_main!(benches);
