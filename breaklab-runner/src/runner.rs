//! Analysis runner: wires config, validation, grid and summaries together.
//!
//! Anchors for every threshold are sampled first. The simulation pass then
//! runs per threshold, on the rayon pool unless parallelism is turned off.
//! Each threshold owns its RNG stream, so both paths give the same result.

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use breaklab_core::domain::{Candle, ThresholdRun};
use breaklab_core::error::{validate_input, EngineError};
use breaklab_core::grid::{build_grid, simulate_run, GridPlan};
use breaklab_core::rng::RngHierarchy;

use crate::config::{AnalysisConfig, ConfigError};
use crate::data_loader::dataset_hash;
use crate::summary::{summarize, ThresholdSummary};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid input: {0}")]
    Engine(#[from] EngineError),
}

/// Current schema version for persisted results.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Settings the run used, with the margin resolved.
    pub config: AnalysisConfig,
    pub config_hash: String,
    pub dataset_hash: String,
    pub candle_count: usize,
    pub average_range: f64,
    pub thresholds: Vec<i64>,
    pub summaries: Vec<ThresholdSummary>,
    pub runs: Vec<ThresholdRun>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Runs analyses for one config.
pub struct AnalysisRunner {
    config: AnalysisConfig,
    parallel: bool,
}

impl AnalysisRunner {
    pub fn new(config: AnalysisConfig) -> Self {
        let parallel = config.analysis.parallel;
        Self { config, parallel }
    }

    /// Enables or disables parallel simulation.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze `candles`. `request_margin` is used only when the config has none.
    pub fn run(
        &self,
        candles: &[Candle],
        request_margin: Option<f64>,
    ) -> Result<AnalysisResult, RunError> {
        self.config.validate()?;
        let margin = self.config.resolve_margin(request_margin)?;
        validate_input(candles, margin)?;

        let mut config = self.config.clone();
        config.analysis.margin = Some(margin);

        let plan = GridPlan::for_candles(candles, config.analysis.threshold_count);
        let mut runs = build_grid(candles, &plan, &RngHierarchy::new(config.analysis.seed));
        debug!(
            "sampled {} thresholds (avg range {:.4}), simulating {}",
            runs.len(),
            plan.average_range,
            if self.parallel { "in parallel" } else { "sequentially" }
        );

        if self.parallel {
            runs.par_iter_mut()
                .for_each(|run| simulate_run(run, candles, margin));
        } else {
            runs.iter_mut()
                .for_each(|run| simulate_run(run, candles, margin));
        }

        let summaries = summarize(&runs);
        info!(
            "analyzed {} candles at margin {margin}%: {} thresholds, {} exits",
            candles.len(),
            runs.len(),
            summaries.iter().map(|s| s.exited).sum::<usize>()
        );

        Ok(AnalysisResult {
            schema_version: SCHEMA_VERSION,
            config_hash: config.config_hash()?,
            config,
            dataset_hash: dataset_hash(candles),
            candle_count: candles.len(),
            average_range: plan.average_range,
            thresholds: plan.thresholds,
            summaries,
            runs,
        })
    }
}
