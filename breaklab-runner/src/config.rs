//! Serializable analysis configuration, parsed from TOML.
//!
//! ```toml
//! [analysis]
//! margin = 10.0
//! threshold_count = 16
//! seed = 42
//! parallel = true
//! ```
//!
//! Every key is optional. `margin` may also come from the candle request
//! body; see [`AnalysisConfig::resolve_margin`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use breaklab_core::range::DEFAULT_THRESHOLD_COUNT;

/// Errors from loading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("margin must be a positive percentage, got {0}")]
    InvalidMargin(f64),
    #[error("threshold_count must be at least 2, got {0}")]
    InvalidThresholdCount(usize),
    #[error("no margin given: set [analysis] margin, pass --margin, or include it in the request")]
    MissingMargin,
}

/// Top-level config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub analysis: AnalysisSection,
}

/// The `[analysis]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSection {
    /// Trailing-stop margin as a percentage of the threshold.
    #[serde(default)]
    pub margin: Option<f64>,
    #[serde(default = "default_threshold_count")]
    pub threshold_count: usize,
    #[serde(default)]
    pub seed: u64,
    /// Simulate thresholds on the rayon pool. Never changes the result.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_threshold_count() -> usize {
    DEFAULT_THRESHOLD_COUNT
}

fn default_parallel() -> bool {
    true
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            margin: None,
            threshold_count: DEFAULT_THRESHOLD_COUNT,
            seed: 0,
            parallel: true,
        }
    }
}

impl AnalysisConfig {
    /// Parse a config from a TOML string. Does not validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML config file, then validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(margin) = self.analysis.margin {
            check_margin(margin)?;
        }
        if self.analysis.threshold_count < 2 {
            return Err(ConfigError::InvalidThresholdCount(
                self.analysis.threshold_count,
            ));
        }
        Ok(())
    }

    /// Pick the margin to run with: the configured one, else the request's.
    pub fn resolve_margin(&self, request_margin: Option<f64>) -> Result<f64, ConfigError> {
        let margin = self
            .analysis
            .margin
            .or(request_margin)
            .ok_or(ConfigError::MissingMargin)?;
        check_margin(margin)?;
        Ok(margin)
    }

    /// Deterministic BLAKE3 hash over the settings that affect results.
    ///
    /// `parallel` is left out: it never changes the output.
    pub fn config_hash(&self) -> Result<String, ConfigError> {
        let canonical = serde_json::json!({
            "margin": self.analysis.margin,
            "seed": self.analysis.seed,
            "threshold_count": self.analysis.threshold_count,
        });
        let json = serde_json::to_string(&canonical)?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}

fn check_margin(margin: f64) -> Result<(), ConfigError> {
    if margin.is_finite() && margin > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidMargin(margin))
    }
}
