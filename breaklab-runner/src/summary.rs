//! Per-threshold outcome counts and gain statistics.

use serde::{Deserialize, Serialize};

use breaklab_core::domain::{Direction, ThresholdRun};

/// Aggregate view of one threshold's simulated states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSummary {
    pub threshold: i64,
    pub states: usize,
    /// States with a recorded exit.
    pub exited: usize,
    /// Armed but still open when the candles ran out.
    pub armed_open: usize,
    /// Neither armed nor exited.
    pub untriggered: usize,
    pub up_exits: usize,
    pub down_exits: usize,
    /// Exits with a strictly positive gain.
    pub wins: usize,
    pub total_gain: f64,
    /// Mean gain over exited states; 0 when nothing exited.
    pub mean_gain: f64,
    /// `wins / exited`; 0 when nothing exited.
    pub win_rate: f64,
}

impl ThresholdSummary {
    pub fn from_run(run: &ThresholdRun) -> Self {
        let mut summary = Self {
            threshold: run.threshold,
            states: 0,
            exited: 0,
            armed_open: 0,
            untriggered: 0,
            up_exits: 0,
            down_exits: 0,
            wins: 0,
            total_gain: 0.0,
            mean_gain: 0.0,
            win_rate: 0.0,
        };

        for state in run.states() {
            summary.states += 1;
            if state.is_terminal() {
                summary.exited += 1;
                summary.total_gain += state.gain;
                if state.gain > 0.0 {
                    summary.wins += 1;
                }
                match state.direction {
                    Direction::Up => summary.up_exits += 1,
                    Direction::Down => summary.down_exits += 1,
                    Direction::None => {}
                }
            } else if state.is_enabled {
                summary.armed_open += 1;
            } else {
                summary.untriggered += 1;
            }
        }

        if summary.exited > 0 {
            summary.mean_gain = summary.total_gain / summary.exited as f64;
            summary.win_rate = summary.wins as f64 / summary.exited as f64;
        }
        summary
    }
}

/// Summarize every run, keeping threshold order.
pub fn summarize(runs: &[ThresholdRun]) -> Vec<ThresholdSummary> {
    runs.iter().map(ThresholdSummary::from_run).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use breaklab_core::domain::{DaySlice, Exit, SimulationState};
    use chrono::NaiveDate;

    fn run_with(states: Vec<SimulationState>) -> ThresholdRun {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut slice = DaySlice::new(date);
        slice.times = states;
        let mut run = ThresholdRun::new(5);
        run.dates.push(slice);
        run
    }

    fn state(hour: u32) -> SimulationState {
        let t = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        SimulationState::new(5, t, 100)
    }

    #[test]
    fn counts_every_outcome() {
        let mut up_win = state(9);
        up_win.arm(Direction::Up, 105);
        up_win.record_exit(
            Exit {
                direction: Direction::Up,
                price: 110,
                gain: 5.0,
            },
            up_win.time,
        );

        let mut down_loss = state(10);
        down_loss.record_exit(
            Exit {
                direction: Direction::Down,
                price: 94,
                gain: -1.5,
            },
            down_loss.time,
        );

        let mut open = state(11);
        open.arm(Direction::Up, 105);

        let untouched = state(12);

        let run = run_with(vec![up_win, down_loss, open, untouched]);
        let summary = ThresholdSummary::from_run(&run);
        assert_eq!(summary.threshold, 5);
        assert_eq!(summary.states, 4);
        assert_eq!(summary.exited, 2);
        assert_eq!(summary.armed_open, 1);
        assert_eq!(summary.untriggered, 1);
        assert_eq!(summary.up_exits, 1);
        assert_eq!(summary.down_exits, 1);
        assert_eq!(summary.wins, 1);
        assert!((summary.total_gain - 3.5).abs() < 1e-12);
        assert!((summary.mean_gain - 1.75).abs() < 1e-12);
        assert!((summary.win_rate - 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_run_has_zero_rates() {
        let summary = ThresholdSummary::from_run(&ThresholdRun::new(7));
        assert_eq!(summary.states, 0);
        assert_eq!(summary.mean_gain, 0.0);
        assert_eq!(summary.win_rate, 0.0);
    }
}
