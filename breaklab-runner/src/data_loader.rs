//! Candle loading for the runner.
//!
//! Two input formats, picked by file extension:
//! - `.csv` with header `timestamp,open,high,low,close,volume`
//! - `.json`, either a bare array of candles or a request object
//!   `{"candles": [...], "margin": 10.0}`
//!
//! Timestamps are ISO-8601 without offset (`2024-01-02T09:15:00`). JSON
//! candles may name the field `date` instead of `timestamp`.

use std::io::Read;
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use breaklab_core::domain::Candle;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported candle file '{0}' (expected .csv or .json)")]
    UnsupportedFormat(String),
}

/// Candles plus provenance.
#[derive(Debug, Clone)]
pub struct LoadedCandles {
    pub candles: Vec<Candle>,
    /// Margin carried by a JSON request body, if any.
    pub margin: Option<f64>,
    /// BLAKE3 over every candle field.
    pub dataset_hash: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonInput {
    Bare(Vec<Candle>),
    Request {
        candles: Vec<Candle>,
        #[serde(default)]
        margin: Option<f64>,
    },
}

/// Load candles from a `.csv` or `.json` file.
pub fn load_candles(path: &Path) -> Result<LoadedCandles, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let read_err = |source| LoadError::Read {
        path: path.display().to_string(),
        source,
    };

    let (candles, margin) = match ext.as_deref() {
        Some("csv") => {
            let file = std::fs::File::open(path).map_err(read_err)?;
            (parse_csv(file)?, None)
        }
        Some("json") => {
            let text = std::fs::read_to_string(path).map_err(read_err)?;
            parse_json(&text)?
        }
        _ => return Err(LoadError::UnsupportedFormat(path.display().to_string())),
    };

    if candles.windows(2).any(|w| w[1].timestamp < w[0].timestamp) {
        warn!("{}: candles are not in ascending time order", path.display());
    }
    debug!("loaded {} candles from {}", candles.len(), path.display());

    let dataset_hash = dataset_hash(&candles);
    Ok(LoadedCandles {
        candles,
        margin,
        dataset_hash,
    })
}

/// Parse headered CSV candles.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Candle>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let candles = rdr
        .deserialize::<Candle>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(candles)
}

/// Parse a JSON candle array or request object; returns the request margin too.
pub fn parse_json(text: &str) -> Result<(Vec<Candle>, Option<f64>), LoadError> {
    Ok(match serde_json::from_str(text)? {
        JsonInput::Bare(candles) => (candles, None),
        JsonInput::Request { candles, margin } => (candles, margin),
    })
}

/// Deterministic BLAKE3 hash over all candle data, in input order.
pub fn dataset_hash(candles: &[Candle]) -> String {
    let mut hasher = blake3::Hasher::new();
    for c in candles {
        hasher.update(c.timestamp.to_string().as_bytes());
        hasher.update(&c.open.to_le_bytes());
        hasher.update(&c.high.to_le_bytes());
        hasher.update(&c.low.to_le_bytes());
        hasher.update(&c.close.to_le_bytes());
        hasher.update(&c.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
