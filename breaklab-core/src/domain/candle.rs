//! Candle — the fundamental market data unit.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// OHLCV candle for a single one-minute interval.
///
/// Candles are owned by the caller and only ever read by the engine. A run
/// assumes its candles are sorted ascending by `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Interval start. Older request bodies call this field `date`.
    #[serde(alias = "date")]
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Candle {
    pub fn new(
        timestamp: NaiveDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calendar day this candle belongs to.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Returns true if any OHLC field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: high >= low and open/close lie inside [low, high].
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }

    /// True when the candle closed above its open.
    pub fn is_up(&self) -> bool {
        self.close > self.open
    }

    /// Truncated distance from the close up to the high: `high - close`.
    pub fn upper_gap(&self) -> i64 {
        (self.high - self.close) as i64
    }

    /// Truncated distance from the low up to the close: `close - low`.
    pub fn down_gap(&self) -> i64 {
        (self.close - self.low) as i64
    }

    /// Truncated integer high.
    pub fn high_level(&self) -> i64 {
        self.high as i64
    }

    /// Truncated integer low.
    pub fn low_level(&self) -> i64 {
        self.low as i64
    }
}
