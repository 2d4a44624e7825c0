//! BreakLab Runner — analysis orchestration, config, loading, export.
//!
//! This crate builds on `breaklab-core` to provide:
//! - TOML analysis config with validation and hashing
//! - Candle loading from CSV or JSON request bodies
//! - Analysis runner with optional rayon parallelism
//! - Per-threshold summaries
//! - JSON / CSV export with schema versioning

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;
pub mod summary;

pub use config::{AnalysisConfig, AnalysisSection, ConfigError};
pub use data_loader::{dataset_hash, load_candles, LoadError, LoadedCandles};
pub use export::{
    export_json, export_runs_json, export_states_csv, export_summary_csv, import_json,
    load_result,
};
pub use runner::{AnalysisResult, AnalysisRunner, RunError, SCHEMA_VERSION};
pub use summary::{summarize, ThresholdSummary};
