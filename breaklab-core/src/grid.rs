//! Grid orchestrator — threshold × date × hour sweep.
//!
//! Two passes:
//! 1. `build_grid` samples every anchor of every threshold.
//! 2. `simulate_run` walks the simulator over each state of one threshold.
//!
//! All anchors exist before the first candle is simulated. Each threshold
//! draws its anchors from its own RNG stream, so pass 2 may run thresholds on
//! separate threads without changing the result.

use log::{debug, info, warn};

use crate::calendar::DateSequence;
use crate::domain::{Candle, ThresholdRun};
use crate::error::{validate_input, EngineError};
use crate::range::{average_daily_range, threshold_levels, DEFAULT_THRESHOLD_COUNT};
use crate::rng::RngHierarchy;
use crate::sampler::sample_day;
use crate::simulator::{simulate_state, BreakoutParams};

/// Sweep parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Requested number of threshold levels (duplicates collapse).
    pub threshold_count: usize,
    /// Master seed for anchor sampling.
    pub seed: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            threshold_count: DEFAULT_THRESHOLD_COUNT,
            seed: 0,
        }
    }
}

/// Thresholds and dates a grid is built over.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPlan {
    pub average_range: f64,
    pub thresholds: Vec<i64>,
}

impl GridPlan {
    pub fn for_candles(candles: &[Candle], threshold_count: usize) -> Self {
        let average_range = average_daily_range(candles);
        let thresholds = threshold_levels(average_range, threshold_count);
        if thresholds.is_empty() {
            warn!(
                "average daily range {average_range:.4} leaves no usable threshold; result will be empty"
            );
        }
        Self {
            average_range,
            thresholds,
        }
    }
}

/// Pass 1: sample anchors for every (threshold, date, hour) cell.
///
/// `candles` must be non-empty and sorted.
pub fn build_grid(candles: &[Candle], plan: &GridPlan, rng: &RngHierarchy) -> Vec<ThresholdRun> {
    let (Some(first), Some(last)) = (candles.first(), candles.last()) else {
        return Vec::new();
    };

    plan.thresholds
        .iter()
        .enumerate()
        .map(|(index, &threshold)| {
            let mut stream = rng.rng_for(threshold, index as u64);
            let mut run = ThresholdRun::new(threshold);
            for date in DateSequence::new(first.timestamp, last.timestamp) {
                run.dates
                    .push(sample_day(date, candles, threshold, &mut stream));
            }
            debug!(
                "threshold {threshold}: sampled {} anchors over {} days",
                run.states().count(),
                run.dates.len()
            );
            run
        })
        .collect()
}

/// Pass 2 for one threshold: simulate every state in date, then hour order.
pub fn simulate_run(run: &mut ThresholdRun, candles: &[Candle], margin: f64) {
    let params = BreakoutParams::new(run.threshold, margin);
    for state in run.states_mut() {
        simulate_state(state, candles, &params);
    }
}

/// Full sequential analysis: validate, build every anchor, then simulate.
pub fn analyze(
    candles: &[Candle],
    margin: f64,
    config: &GridConfig,
) -> Result<Vec<ThresholdRun>, EngineError> {
    validate_input(candles, margin)?;
    if config.threshold_count < 2 {
        return Err(EngineError::InvalidThresholdCount(config.threshold_count));
    }

    let plan = GridPlan::for_candles(candles, config.threshold_count);
    let mut runs = build_grid(candles, &plan, &RngHierarchy::new(config.seed));
    for run in &mut runs {
        simulate_run(run, candles, margin);
    }

    info!(
        "analyzed {} candles: {} thresholds, {} states",
        candles.len(),
        runs.len(),
        runs.iter().map(|r| r.states().count()).sum::<usize>()
    );
    Ok(runs)
}
