//! Criterion benchmarks for BreakLab hot paths.
//!
//! Benchmarks:
//! 1. Single-state walk (breakout simulator over a trading day)
//! 2. Anchor sampling (one day of hourly anchors)
//! 3. Range generation (average daily range + threshold levels)
//! 4. Full grid (build + simulate across thresholds)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use breaklab_core::domain::{Candle, SimulationState};
use breaklab_core::grid::{analyze, GridConfig};
use breaklab_core::range::{average_daily_range, threshold_levels};
use breaklab_core::sampler::sample_day;
use breaklab_core::simulator::{simulate_state, BreakoutParams};

// ── Helpers ──────────────────────────────────────────────────────────

/// `days` sessions of minute candles from 09:00 to 15:59.
fn make_candles(days: usize) -> Vec<Candle> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    (0..days)
        .flat_map(|d| {
            let start = base + chrono::Duration::days(d as i64);
            (0..420).map(move |i| {
                let mid = 1000.0 + ((i + d * 420) as f64 * 0.05).sin() * 30.0;
                let open = mid - 0.5;
                let close = mid + 0.5;
                Candle::new(
                    start + chrono::Duration::minutes(i as i64),
                    open,
                    mid + 2.0,
                    mid - 2.0,
                    close,
                    1_000 + (i as u64 % 250),
                )
            })
        })
        .collect()
}

// ── 1. Single-state walk ─────────────────────────────────────────────

fn bench_simulate_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_state");
    let candles = make_candles(5);
    let anchor = candles[0].close as i64;

    for &threshold in &[5i64, 20, 60] {
        let params = BreakoutParams::new(threshold, 10.0);
        group.bench_with_input(
            BenchmarkId::from_parameter(threshold),
            &threshold,
            |b, &threshold| {
                b.iter(|| {
                    let mut state = SimulationState::new(threshold, candles[0].timestamp, anchor);
                    simulate_state(&mut state, black_box(&candles), &params);
                    state
                });
            },
        );
    }

    group.finish();
}

// ── 2. Anchor sampling ───────────────────────────────────────────────

fn bench_sample_day(c: &mut Criterion) {
    let candles = make_candles(20);
    let date = candles[0].timestamp;

    c.bench_function("sample_day_20_sessions", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| sample_day(black_box(date), black_box(&candles), 10, &mut rng));
    });
}

// ── 3. Range generation ──────────────────────────────────────────────

fn bench_range(c: &mut Criterion) {
    let candles = make_candles(60);

    c.bench_function("average_range_and_levels_60_sessions", |b| {
        b.iter(|| threshold_levels(average_daily_range(black_box(&candles)), 16));
    });
}

// ── 4. Full grid ─────────────────────────────────────────────────────

fn bench_full_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_grid");
    group.sample_size(20);

    for &days in &[5usize, 20] {
        let candles = make_candles(days);
        let config = GridConfig {
            threshold_count: 16,
            seed: 42,
        };
        group.bench_with_input(BenchmarkId::new("sessions", days), &candles, |b, candles| {
            b.iter(|| analyze(black_box(candles), 10.0, &config));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_simulate_state,
    bench_sample_day,
    bench_range,
    bench_full_grid,
);
criterion_main!(benches);
