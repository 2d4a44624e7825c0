//! Breakout simulator — the breakout-confirmation / trailing-stop state machine.
//!
//! A state starts disabled at its anchor price. A candle touching
//! `anchor ± threshold` either ends the trade on the spot (a wick longer than
//! the threshold) or arms it in a direction with a stop placed `cut_margin`
//! behind the extreme. Once armed, the stop trails the extreme and the trade
//! ends when price comes back through it or a single candle retraces more
//! than the margin.
//!
//! Transitions per candle:
//!
//! | state    | outcomes                                              |
//! |----------|-------------------------------------------------------|
//! | disabled | hold, exit up, exit down, armed up, armed down        |
//! | enabled  | hold, exit, ratchet                                   |
//!
//! Arming re-evaluates the same candle under the enabled rules before the walk
//! moves on. All price levels are truncated toward zero.

use crate::domain::{Candle, Direction, Exit, SimulationState};

/// Threshold and stop distance for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakoutParams {
    /// Threshold as a price distance.
    pub threshold: f64,
    /// Trailing stop distance: `threshold * margin / 100`.
    pub cut_margin: f64,
}

impl BreakoutParams {
    /// `margin_pct` is a percentage: `10.0` keeps the stop 10% of the threshold
    /// behind the extreme.
    pub fn new(threshold: i64, margin_pct: f64) -> Self {
        let threshold = threshold as f64;
        Self {
            threshold,
            cut_margin: threshold * (margin_pct / 100.0),
        }
    }

    fn trigger(&self) -> i64 {
        self.threshold as i64
    }

    fn margin_level(&self) -> i64 {
        self.cut_margin as i64
    }
}

/// Whether the walk over subsequent candles should continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Continue,
    Done,
}

/// Result of applying one rule set to one candle.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Transition {
    Hold,
    Armed { direction: Direction, cut_at: i64 },
    Ratchet(i64),
    Exit(Exit),
}

/// Apply `candle` to `state`, re-running the enabled rules on the same candle
/// when it arms the breakout.
pub fn evaluate_candle(
    state: &mut SimulationState,
    candle: &Candle,
    params: &BreakoutParams,
) -> Progress {
    if state.is_terminal() {
        return Progress::Done;
    }
    loop {
        let transition = if state.is_enabled {
            trail(state, candle, params)
        } else {
            confirm(state, candle, params)
        };
        match transition {
            Transition::Hold => return Progress::Continue,
            Transition::Armed { direction, cut_at } => {
                state.arm(direction, cut_at);
            }
            Transition::Ratchet(level) => {
                state.ratchet(level);
                return Progress::Continue;
            }
            Transition::Exit(exit) => {
                state.record_exit(exit, candle.timestamp);
                return Progress::Done;
            }
        }
    }
}

/// Walk every candle at or after the anchor time until the state terminates.
///
/// A state that never terminates keeps its outcome fields untouched.
/// Re-running on a terminal state is a no-op.
pub fn simulate_state(state: &mut SimulationState, candles: &[Candle], params: &BreakoutParams) {
    if state.is_terminal() {
        return;
    }
    let from = candles.partition_point(|c| c.timestamp < state.time);
    for candle in &candles[from..] {
        if evaluate_candle(state, candle, params) == Progress::Done {
            break;
        }
    }
    state.executed_tree = true;
}

/// Rules for a state that has not confirmed a breakout yet.
fn confirm(state: &SimulationState, candle: &Candle, params: &BreakoutParams) -> Transition {
    let check_high = state.start_value.saturating_add(params.trigger());
    let check_low = state.start_value.saturating_sub(params.trigger());
    let touched_high = check_high <= candle.high_level();
    let touched_low = check_low >= candle.low_level();

    if !touched_high && !touched_low {
        return Transition::Hold;
    }

    let anchor = state.start_value as f64;
    if candle.upper_gap() > params.trigger() {
        return Transition::Exit(Exit {
            direction: Direction::Up,
            price: (candle.high - params.cut_margin) as i64,
            gain: candle.high - anchor - params.threshold - params.cut_margin,
        });
    }
    if candle.down_gap() > params.trigger() {
        return Transition::Exit(Exit {
            direction: Direction::Down,
            price: (candle.low + params.cut_margin) as i64,
            gain: anchor - candle.low - params.threshold - params.cut_margin,
        });
    }

    let direction = match (touched_high, touched_low) {
        (true, true) if candle.is_up() => Direction::Up,
        (true, true) => Direction::Down,
        (true, false) => Direction::Up,
        _ => Direction::Down,
    };
    let cut_at = match direction {
        Direction::Up => (candle.high - params.cut_margin) as i64,
        _ => (candle.low + params.cut_margin) as i64,
    };
    Transition::Armed { direction, cut_at }
}

/// Rules for an armed state with an active trailing stop.
fn trail(state: &SimulationState, candle: &Candle, params: &BreakoutParams) -> Transition {
    match state.direction {
        Direction::Up => trail_up(state, candle, params),
        Direction::Down => trail_down(state, candle, params),
        Direction::None => {
            debug_assert!(false, "enabled state without a direction");
            Transition::Hold
        }
    }
}

fn trail_up(state: &SimulationState, candle: &Candle, params: &BreakoutParams) -> Transition {
    let anchor = state.start_value as f64;
    let stop = state.cut_at;
    let high = candle.high_level();

    if high < stop {
        // Gapped below the stop: gain is taken from this candle's high.
        return Transition::Exit(Exit {
            direction: Direction::Up,
            price: stop,
            gain: high as f64 - anchor - params.threshold,
        });
    }
    if candle.low_level() < stop {
        return Transition::Exit(Exit {
            direction: Direction::Up,
            price: stop,
            gain: stop as f64 - anchor - params.threshold,
        });
    }
    if candle.upper_gap() > params.margin_level() {
        return Transition::Exit(Exit {
            direction: Direction::Up,
            price: (candle.high - params.cut_margin) as i64,
            gain: candle.high - anchor - params.threshold - params.cut_margin,
        });
    }
    let trailed = (candle.high - params.cut_margin) as i64;
    if trailed > stop {
        Transition::Ratchet(trailed)
    } else {
        Transition::Hold
    }
}

fn trail_down(state: &SimulationState, candle: &Candle, params: &BreakoutParams) -> Transition {
    let anchor = state.start_value as f64;
    let stop = state.cut_at;
    let low = candle.low_level();

    if low > stop {
        // Gapped above the stop: gain is taken from this candle's low.
        return Transition::Exit(Exit {
            direction: Direction::Down,
            price: stop,
            gain: anchor - low as f64 - params.threshold,
        });
    }
    if candle.high_level() > stop {
        return Transition::Exit(Exit {
            direction: Direction::Down,
            price: stop,
            gain: anchor - stop as f64 - params.threshold,
        });
    }
    if candle.down_gap() > params.margin_level() {
        return Transition::Exit(Exit {
            direction: Direction::Down,
            price: (candle.low + params.cut_margin) as i64,
            gain: anchor - candle.low - params.threshold - params.cut_margin,
        });
    }
    let trailed = (candle.low + params.cut_margin) as i64;
    if trailed < stop {
        Transition::Ratchet(trailed)
    } else {
        Transition::Hold
    }
}
