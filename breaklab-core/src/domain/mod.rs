//! Domain types for BreakLab

pub mod candle;
pub mod state;

pub use candle::Candle;
pub use state::{DaySlice, Direction, Exit, SimulationState, ThresholdRun};
