//! Integration tests for the runner pipeline: file in, analysis, artifacts out.

use std::fmt::Write as _;
use std::path::Path;

use breaklab_runner::{
    export_json, export_states_csv, export_summary_csv, load_candles, load_result,
    AnalysisConfig, AnalysisRunner, SCHEMA_VERSION,
};

/// Two sessions of minute candles, 09:00–15:59, as CSV text.
fn session_csv() -> String {
    let mut out = String::from("timestamp,open,high,low,close,volume\n");
    for day in [3, 4] {
        for minute in 0..420u32 {
            let mid = 180.0 + ((minute as f64) / 30.0).sin() * 12.0 + day as f64;
            writeln!(
                out,
                "2024-06-{day:02}T{:02}:{:02}:00,{:.2},{:.2},{:.2},{:.2},{}",
                9 + minute / 60,
                minute % 60,
                mid - 0.4,
                mid + 1.5,
                mid - 1.5,
                mid + 0.4,
                500 + minute
            )
            .unwrap();
        }
    }
    out
}

fn write(path: &Path, text: &str) {
    std::fs::write(path, text).unwrap();
}

#[test]
fn csv_file_to_exported_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let candles_path = dir.path().join("candles.csv");
    write(&candles_path, &session_csv());

    let loaded = load_candles(&candles_path).unwrap();
    assert_eq!(loaded.candles.len(), 840);
    assert_eq!(loaded.margin, None);

    let config_path = dir.path().join("breaklab.toml");
    write(
        &config_path,
        "[analysis]\nmargin = 10.0\nthreshold_count = 6\nseed = 7\n",
    );
    let config = AnalysisConfig::load(&config_path).unwrap();

    let result = AnalysisRunner::new(config)
        .run(&loaded.candles, loaded.margin)
        .unwrap();
    assert_eq!(result.schema_version, SCHEMA_VERSION);
    assert_eq!(result.dataset_hash, loaded.dataset_hash);
    assert!(!result.runs.is_empty());
    for run in &result.runs {
        assert_eq!(run.dates.len(), 2);
        assert!(run.dates.iter().all(|d| d.times.len() == 7));
    }

    let total_states: usize = result.summaries.iter().map(|s| s.states).sum();
    for s in &result.summaries {
        assert_eq!(s.states, s.exited + s.armed_open + s.untriggered);
        assert_eq!(s.exited, s.up_exits + s.down_exits);
    }

    // JSON round-trip through disk.
    let json_path = dir.path().join("result.json");
    write(&json_path, &export_json(&result).unwrap());
    assert_eq!(load_result(&json_path).unwrap(), result);

    // CSVs: header + one row per state / per threshold.
    let states = export_states_csv(&result.runs).unwrap();
    assert_eq!(states.lines().count(), total_states + 1);
    let summary = export_summary_csv(&result.summaries).unwrap();
    assert_eq!(summary.lines().count(), result.summaries.len() + 1);
}

#[test]
fn json_request_supplies_margin() {
    let dir = tempfile::tempdir().unwrap();
    let csv = session_csv();
    let mut rdr = csv::Reader::from_reader(csv.as_bytes());
    let candles: Vec<serde_json::Value> = rdr
        .records()
        .map(|r| {
            let r = r.unwrap();
            serde_json::json!({
                "date": &r[0],
                "open": r[1].parse::<f64>().unwrap(),
                "high": r[2].parse::<f64>().unwrap(),
                "low": r[3].parse::<f64>().unwrap(),
                "close": r[4].parse::<f64>().unwrap(),
                "volume": r[5].parse::<u64>().unwrap(),
            })
        })
        .collect();
    let request = serde_json::json!({ "candles": candles, "margin": 25.0 });

    let path = dir.path().join("request.json");
    write(&path, &request.to_string());
    let loaded = load_candles(&path).unwrap();
    assert_eq!(loaded.margin, Some(25.0));

    let from_json = AnalysisRunner::new(AnalysisConfig::default())
        .run(&loaded.candles, loaded.margin)
        .unwrap();
    assert_eq!(from_json.config.analysis.margin, Some(25.0));

    // Same candles via CSV give the same dataset hash and result.
    let csv_path = dir.path().join("candles.csv");
    write(&csv_path, &csv);
    let via_csv = load_candles(&csv_path).unwrap();
    assert_eq!(via_csv.dataset_hash, loaded.dataset_hash);
    let from_csv = AnalysisRunner::new(AnalysisConfig::default())
        .run(&via_csv.candles, Some(25.0))
        .unwrap();
    assert_eq!(from_csv, from_json);
}

#[test]
fn flat_session_yields_empty_result_not_error() {
    let mut csv = String::from("timestamp,open,high,low,close,volume\n");
    for minute in 0..120u32 {
        writeln!(
            csv,
            "2024-06-03T{:02}:{:02}:00,50,50,50,50,1",
            9 + minute / 60,
            minute % 60
        )
        .unwrap();
    }
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flat.csv");
    write(&path, &csv);

    let loaded = load_candles(&path).unwrap();
    let result = AnalysisRunner::new(AnalysisConfig::default())
        .run(&loaded.candles, Some(10.0))
        .unwrap();
    assert_eq!(result.average_range, 0.0);
    assert!(result.thresholds.is_empty());
    assert!(result.runs.is_empty());
    assert!(result.summaries.is_empty());
}
