//! BreakLab Core — candles, threshold grid, anchor sampling, breakout simulator.
//!
//! This crate contains the simulation engine:
//! - Domain types (candles, simulation states, day slices, threshold runs)
//! - Range generator deriving threshold levels from average daily range
//! - Calendar expander over the candle date span
//! - Seeded anchor sampler per trading hour
//! - Breakout / trailing-stop state machine
//! - Two-pass grid orchestrator

pub mod calendar;
pub mod domain;
pub mod error;
pub mod grid;
pub mod range;
pub mod rng;
pub mod sampler;
pub mod simulator;

pub use domain::{Candle, DaySlice, Direction, SimulationState, ThresholdRun};
pub use error::EngineError;
pub use grid::{analyze, GridConfig, GridPlan};
