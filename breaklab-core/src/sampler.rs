//! Anchor sampler — one random (time, price) starting point per trading hour.

use chrono::{Duration, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{Candle, DaySlice, SimulationState};

/// Hour buckets sampled per day, each `[HH:00, HH+1:00)`.
pub const TRADING_HOURS: [u32; 7] = [9, 10, 11, 12, 13, 14, 15];

/// Random integer price level inside `[low, high]`, preferring interior levels.
///
/// - `low == high` → `low`
/// - one apart → either bound, 50/50
/// - two apart → the single interior level
/// - wider → uniform over the open interval `(low, high)`
pub fn random_in_bounds<R: Rng + ?Sized>(low: i64, high: i64, rng: &mut R) -> i64 {
    debug_assert!(low <= high, "inverted bounds {low} > {high}");
    match high - low {
        d if d <= 0 => low,
        1 => {
            if rng.gen_bool(0.5) {
                low
            } else {
                high
            }
        }
        2 => low + 1,
        _ => rng.gen_range(low + 1..high),
    }
}

/// The slice of `candles` whose timestamps fall in `[start, end)`.
///
/// `candles` must be sorted ascending.
pub fn candles_between(candles: &[Candle], start: NaiveDateTime, end: NaiveDateTime) -> &[Candle] {
    let from = candles.partition_point(|c| c.timestamp < start);
    let to = candles.partition_point(|c| c.timestamp < end);
    &candles[from..to.max(from)]
}

/// Sample one state per populated trading hour of `date`.
///
/// Hours without candles are skipped, so the slice may hold fewer than
/// `TRADING_HOURS.len()` states.
pub fn sample_day<R: Rng + ?Sized>(
    date: NaiveDateTime,
    candles: &[Candle],
    threshold: i64,
    rng: &mut R,
) -> DaySlice {
    let mut slice = DaySlice::new(date);
    for hour in TRADING_HOURS {
        let Some(start) = date.date().and_hms_opt(hour, 0, 0) else {
            continue;
        };
        let bucket = candles_between(candles, start, start + Duration::hours(1));
        if let Some(candle) = bucket.choose(rng) {
            let anchor = random_in_bounds(candle.low_level(), candle.high_level(), rng);
            slice
                .times
                .push(SimulationState::new(threshold, candle.timestamp, anchor));
        }
    }
    slice
}
