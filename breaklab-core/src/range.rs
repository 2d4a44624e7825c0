//! Range generator — threshold levels derived from average daily volatility.
//!
//! The daily range is `max(high) - min(low)` over one calendar day. Thresholds
//! are spread between a third of the average daily range and one and a half
//! times it.

use std::collections::BTreeMap;

use crate::domain::Candle;

/// Default number of threshold levels tested per run.
pub const DEFAULT_THRESHOLD_COUNT: usize = 16;

/// Lower threshold bound as a fraction of the average daily range.
pub const LOWER_RANGE_DIVISOR: f64 = 3.0;

/// Upper threshold bound as a multiple of the average daily range.
pub const UPPER_RANGE_MULTIPLIER: f64 = 1.5;

/// Average of the per-day high/low spread. Zero when there are no candles.
pub fn average_daily_range(candles: &[Candle]) -> f64 {
    let mut days: BTreeMap<_, (f64, f64)> = BTreeMap::new();
    for c in candles {
        days.entry(c.day())
            .and_modify(|(high, low)| {
                *high = high.max(c.high);
                *low = low.min(c.low);
            })
            .or_insert((c.high, c.low));
    }
    if days.is_empty() {
        return 0.0;
    }
    let total: f64 = days.values().map(|(high, low)| high - low).sum();
    total / days.len() as f64
}

/// Spread `target_count` integer levels between `min_val` and `max_val`.
///
/// Bounds are `trunc(min_val + 0.5)` and `trunc(max_val)`; an inverted pair
/// yields an empty vector. Intermediate samples round half to even and
/// consecutive duplicates collapse, so fewer than `target_count` levels may
/// come back. The first and last entries are pinned to the bounds.
pub fn generate_range_values(min_val: f64, max_val: f64, target_count: usize) -> Vec<i64> {
    let start = (min_val + 0.5) as i64;
    let end = max_val as i64;
    if start > end {
        return Vec::new();
    }
    if target_count < 2 {
        let mut values = vec![start, end];
        values.dedup();
        return values;
    }

    let step = (end - start) as f64 / (target_count - 1) as f64;
    let mut values: Vec<i64> = Vec::with_capacity(target_count);
    let mut current = start as f64;
    for _ in 0..target_count {
        let value = current.round_ties_even() as i64;
        if values.last() != Some(&value) {
            values.push(value);
        }
        current += step;
    }

    // Non-empty: the loop ran at least twice.
    let last = values.len() - 1;
    values[0] = start;
    values[last] = end;
    values
}

/// Ascending threshold levels for a given average daily range.
///
/// Levels below one price unit cannot define a breakout and are dropped, so
/// flat data produces no thresholds at all.
pub fn threshold_levels(average_range: f64, count: usize) -> Vec<i64> {
    let mut levels = generate_range_values(
        average_range / LOWER_RANGE_DIVISOR,
        average_range * UPPER_RANGE_MULTIPLIER,
        count,
    );
    levels.retain(|&level| level >= 1);
    levels.sort_unstable();
    levels
}
