//! Export — JSON and CSV artifacts for analysis results.
//!
//! - **JSON**: full round-trip of `AnalysisResult`, schema-versioned, plus the
//!   bare threshold-run array
//! - **CSV**: one row per simulation state, or one row per threshold summary
//!
//! Unknown (newer) schema versions are rejected on load.

use std::path::Path;

use anyhow::{bail, Context, Result};
use breaklab_core::domain::{Direction, ThresholdRun};

use crate::runner::{AnalysisResult, SCHEMA_VERSION};
use crate::summary::ThresholdSummary;

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize an `AnalysisResult` to pretty JSON.
pub fn export_json(result: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize AnalysisResult to JSON")
}

/// Deserialize an `AnalysisResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<AnalysisResult> {
    let result: AnalysisResult =
        serde_json::from_str(json).context("failed to deserialize AnalysisResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

/// Serialize just the threshold runs, the shape API callers consume.
pub fn export_runs_json(runs: &[ThresholdRun]) -> Result<String> {
    serde_json::to_string_pretty(runs).context("failed to serialize threshold runs to JSON")
}

/// Read an exported result file.
pub fn load_result(path: &Path) -> Result<AnalysisResult> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json).with_context(|| format!("invalid result file {}", path.display()))
}

// ─── CSV export ─────────────────────────────────────────────────────

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::None => "none",
        Direction::Up => "up",
        Direction::Down => "down",
    }
}

/// Export every simulation state as one CSV row.
///
/// Columns: threshold, date, time, start_value, end_value, end_time,
/// is_enabled, direction, cut_at, gain, executed_tree
pub fn export_states_csv(runs: &[ThresholdRun]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "threshold",
        "date",
        "time",
        "start_value",
        "end_value",
        "end_time",
        "is_enabled",
        "direction",
        "cut_at",
        "gain",
        "executed_tree",
    ])?;

    for run in runs {
        for slice in &run.dates {
            for s in &slice.times {
                wtr.write_record([
                    &s.threshold.to_string(),
                    &slice.date.date().to_string(),
                    &s.time.to_string(),
                    &s.start_value.to_string(),
                    &s.end_value.to_string(),
                    &s.end_time.map(|t| t.to_string()).unwrap_or_default(),
                    &s.is_enabled.to_string(),
                    direction_label(s.direction),
                    &s.cut_at.to_string(),
                    &format!("{:.4}", s.gain),
                    &s.executed_tree.to_string(),
                ])?;
            }
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export threshold summaries as CSV, one row per threshold.
pub fn export_summary_csv(summaries: &[ThresholdSummary]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "threshold",
        "states",
        "exited",
        "armed_open",
        "untriggered",
        "up_exits",
        "down_exits",
        "wins",
        "total_gain",
        "mean_gain",
        "win_rate",
    ])?;
    for s in summaries {
        wtr.write_record([
            &s.threshold.to_string(),
            &s.states.to_string(),
            &s.exited.to_string(),
            &s.armed_open.to_string(),
            &s.untriggered.to_string(),
            &s.up_exits.to_string(),
            &s.down_exits.to_string(),
            &s.wins.to_string(),
            &format!("{:.4}", s.total_gain),
            &format!("{:.4}", s.mean_gain),
            &format!("{:.4}", s.win_rate),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}
