//! Simulation state and the nested result grid.
//!
//! `ThresholdRun` → `DaySlice` → `SimulationState` is both the working set the
//! simulator mutates and the serialized result handed back to callers.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Breakout direction of a simulated trade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
}

/// Recorded outcome of a terminated trade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exit {
    pub direction: Direction,
    pub price: i64,
    pub gain: f64,
}

/// One simulated trade attempt, keyed by (threshold, date, hour).
///
/// Starts disabled with no direction and zeroed outcome fields. The state is
/// terminal once an exit has been recorded and must not change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub threshold: i64,
    /// Anchor time.
    pub time: NaiveDateTime,
    /// Anchor price.
    pub start_value: i64,
    pub end_value: i64,
    pub end_time: Option<NaiveDateTime>,
    pub is_enabled: bool,
    pub direction: Direction,
    /// Trailing stop level. Zero until the breakout is armed.
    pub cut_at: i64,
    pub gain: f64,
    /// Set once the simulator has walked candles for this state.
    pub executed_tree: bool,
}

impl SimulationState {
    pub fn new(threshold: i64, time: NaiveDateTime, start_value: i64) -> Self {
        Self {
            threshold,
            time,
            start_value,
            end_value: 0,
            end_time: None,
            is_enabled: false,
            direction: Direction::None,
            cut_at: 0,
            gain: 0.0,
            executed_tree: false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.end_value != 0 || self.end_time.is_some()
    }

    /// Arm the breakout: enable trailing in `direction` with the initial stop.
    pub fn arm(&mut self, direction: Direction, cut_at: i64) {
        debug_assert!(!self.is_terminal(), "arming a terminal state");
        debug_assert!(!self.is_enabled, "arming an already enabled state");
        debug_assert_ne!(direction, Direction::None);
        self.direction = direction;
        self.is_enabled = true;
        self.cut_at = cut_at;
    }

    /// Move the trailing stop. Only tightening moves are legal.
    pub fn ratchet(&mut self, level: i64) {
        debug_assert!(!self.is_terminal(), "ratcheting a terminal state");
        debug_assert!(
            match self.direction {
                Direction::Up => level >= self.cut_at,
                Direction::Down => level <= self.cut_at,
                Direction::None => false,
            },
            "stop loosened from {} to {level} ({:?})",
            self.cut_at,
            self.direction
        );
        self.cut_at = level;
    }

    /// Record the exit. The state is terminal afterwards.
    pub fn record_exit(&mut self, exit: Exit, at: NaiveDateTime) {
        debug_assert!(!self.is_terminal(), "exit recorded twice");
        self.direction = exit.direction;
        self.end_value = exit.price;
        self.end_time = Some(at);
        self.gain = exit.gain;
    }
}

/// All states sampled for one calendar date, in trading-hour order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySlice {
    pub date: NaiveDateTime,
    pub times: Vec<SimulationState>,
}

impl DaySlice {
    pub fn new(date: NaiveDateTime) -> Self {
        Self {
            date,
            times: Vec::new(),
        }
    }
}

/// One tested threshold and its day slices over the full date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRun {
    pub threshold: i64,
    pub dates: Vec<DaySlice>,
}

impl ThresholdRun {
    pub fn new(threshold: i64) -> Self {
        Self {
            threshold,
            dates: Vec::new(),
        }
    }

    /// Iterate every state in date, then hour order.
    pub fn states(&self) -> impl Iterator<Item = &SimulationState> {
        self.dates.iter().flat_map(|d| d.times.iter())
    }

    pub fn states_mut(&mut self) -> impl Iterator<Item = &mut SimulationState> {
        self.dates.iter_mut().flat_map(|d| d.times.iter_mut())
    }
}
