//! BreakLab CLI — breakout threshold analysis over minute candles.
//!
//! Commands:
//! - `analyze` — run the threshold grid over a candle file and export results
//! - `summarize` — print the summary table of a previously exported result

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use breaklab_runner::{
    export_json, export_runs_json, export_states_csv, export_summary_csv, load_candles,
    load_result, AnalysisConfig, AnalysisResult, AnalysisRunner,
};

#[derive(Parser)]
#[command(
    name = "breaklab",
    about = "BreakLab CLI — breakout / trailing-stop threshold analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate every threshold × date × hour cell over a candle file.
    Analyze {
        /// Candle file (.csv or .json).
        #[arg(long)]
        candles: PathBuf,

        /// Path to a TOML config file with an [analysis] table.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Trailing-stop margin in percent of the threshold.
        #[arg(long)]
        margin: Option<f64>,

        /// Master seed for anchor sampling.
        #[arg(long)]
        seed: Option<u64>,

        /// Number of threshold levels to request (duplicates collapse).
        #[arg(long)]
        threshold_count: Option<usize>,

        /// Simulate thresholds on one thread.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Write the full result as JSON.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write only the threshold runs as a JSON array.
        #[arg(long)]
        runs: Option<PathBuf>,

        /// Write one CSV row per simulation state.
        #[arg(long)]
        states_csv: Option<PathBuf>,

        /// Write one CSV row per threshold summary.
        #[arg(long)]
        summary_csv: Option<PathBuf>,
    },
    /// Print the summary table of an exported result.
    Summarize {
        /// Result JSON written by `analyze --output`.
        #[arg(long)]
        result: PathBuf,
    },
}

/// Output paths requested by `analyze`.
struct Outputs {
    result: Option<PathBuf>,
    runs: Option<PathBuf>,
    states_csv: Option<PathBuf>,
    summary_csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            candles,
            config,
            margin,
            seed,
            threshold_count,
            sequential,
            output,
            runs,
            states_csv,
            summary_csv,
        } => {
            let mut config = match config {
                Some(path) => AnalysisConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => AnalysisConfig::default(),
            };
            if let Some(margin) = margin {
                config.analysis.margin = Some(margin);
            }
            if let Some(seed) = seed {
                config.analysis.seed = seed;
            }
            if let Some(count) = threshold_count {
                config.analysis.threshold_count = count;
            }
            if sequential {
                config.analysis.parallel = false;
            }
            let outputs = Outputs {
                result: output,
                runs,
                states_csv,
                summary_csv,
            };
            run_analyze(&candles, config, &outputs)
        }
        Commands::Summarize { result } => {
            let result = load_result(&result)?;
            print_summary(&result);
            Ok(())
        }
    }
}

fn run_analyze(candles_path: &Path, config: AnalysisConfig, outputs: &Outputs) -> Result<()> {
    config.validate()?;
    let loaded = load_candles(candles_path)
        .with_context(|| format!("loading candles {}", candles_path.display()))?;
    info!(
        "loaded {} candles from {}",
        loaded.candles.len(),
        candles_path.display()
    );

    let result = AnalysisRunner::new(config).run(&loaded.candles, loaded.margin)?;
    print_summary(&result);

    if let Some(path) = &outputs.result {
        write_artifact(path, &export_json(&result)?)?;
    }
    if let Some(path) = &outputs.runs {
        write_artifact(path, &export_runs_json(&result.runs)?)?;
    }
    if let Some(path) = &outputs.states_csv {
        write_artifact(path, &export_states_csv(&result.runs)?)?;
    }
    if let Some(path) = &outputs.summary_csv {
        write_artifact(path, &export_summary_csv(&result.summaries)?)?;
    }
    Ok(())
}

fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// First 16 characters of a hash read back from a result file.
fn short_hash(hash: &str) -> String {
    hash.chars().take(16).collect()
}

fn print_summary(result: &AnalysisResult) {
    let margin = result
        .config
        .analysis
        .margin
        .map(|m| format!("{m}%"))
        .unwrap_or_else(|| "-".into());

    println!();
    println!("=== Breakout Analysis ===");
    println!("Candles:        {}", result.candle_count);
    println!("Avg Range:      {:.4}", result.average_range);
    println!("Margin:         {margin}");
    println!("Seed:           {}", result.config.analysis.seed);
    println!("Dataset:        {}", short_hash(&result.dataset_hash));

    if result.summaries.is_empty() {
        println!();
        println!("No usable thresholds (flat data).");
        return;
    }

    println!();
    println!(
        "{:>9} {:>7} {:>7} {:>6} {:>6} {:>6} {:>6} {:>11} {:>9} {:>8}",
        "Threshold", "States", "Exited", "Open", "Idle", "Up", "Down", "Total Gain", "Mean", "Win %"
    );
    println!("{}", "-".repeat(86));
    for s in &result.summaries {
        println!(
            "{:>9} {:>7} {:>7} {:>6} {:>6} {:>6} {:>6} {:>11.2} {:>9.3} {:>7.1}%",
            s.threshold,
            s.states,
            s.exited,
            s.armed_open,
            s.untriggered,
            s.up_exits,
            s.down_exits,
            s.total_gain,
            s.mean_gain,
            s.win_rate * 100.0
        );
    }
}
