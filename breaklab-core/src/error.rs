//! Engine errors and up-front input validation.

use thiserror::Error;

use crate::domain::Candle;

/// Errors from the analysis engine. All of them are raised before any
/// computation starts; the engine never returns partial results.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("candle sequence is empty")]
    EmptyCandles,

    #[error("candles are not sorted ascending by timestamp (first offender at index {index})")]
    UnsortedCandles { index: usize },

    #[error("candle {index} is malformed: {reason}")]
    InvalidCandle { index: usize, reason: String },

    #[error("margin must be a positive percentage, got {0}")]
    NonPositiveMargin(f64),

    #[error("threshold count must be at least 2, got {0}")]
    InvalidThresholdCount(usize),
}

/// Largest absolute OHLC value accepted. Price levels are truncated to `i64`
/// and combined with thresholds of up to 1.5× the daily range, so anything
/// larger could overflow integer arithmetic.
pub const MAX_ABS_PRICE: f64 = 1.0e12;

/// Reject inputs the engine cannot analyze.
pub fn validate_input(candles: &[Candle], margin: f64) -> Result<(), EngineError> {
    if candles.is_empty() {
        return Err(EngineError::EmptyCandles);
    }
    if !(margin.is_finite() && margin > 0.0) {
        return Err(EngineError::NonPositiveMargin(margin));
    }
    for (index, candle) in candles.iter().enumerate() {
        if candle.is_void() {
            return Err(EngineError::InvalidCandle {
                index,
                reason: "NaN price".into(),
            });
        }
        let prices = [candle.open, candle.high, candle.low, candle.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err(EngineError::InvalidCandle {
                index,
                reason: "non-finite price".into(),
            });
        }
        if prices.iter().any(|p| p.abs() > MAX_ABS_PRICE) {
            return Err(EngineError::InvalidCandle {
                index,
                reason: format!("price outside ±{MAX_ABS_PRICE:e}"),
            });
        }
        if candle.high < candle.low {
            return Err(EngineError::InvalidCandle {
                index,
                reason: format!("high {} below low {}", candle.high, candle.low),
            });
        }
    }
    if let Some(index) = candles
        .windows(2)
        .position(|pair| pair[1].timestamp < pair[0].timestamp)
    {
        return Err(EngineError::UnsortedCandles { index: index + 1 });
    }
    Ok(())
}
