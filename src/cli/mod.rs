//! Command-line parsing for the transient comparison tool.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the engine/plotting code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::units::Conversion;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "tcurve",
    version,
    about = "Engine-test transient alignment & comparison charts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Align recorded transients of known duration onto a percent-complete
    /// grid; print a comparison table and optionally export/chart it.
    Align(AlignArgs),
    /// Compare control policies: derive each run's effective duration from a
    /// tracked quantity crossing a completion threshold, then align.
    Compare(CompareArgs),
    /// Re-render a previously exported comparison JSON to an SVG chart.
    Chart(ChartArgs),
    /// Render a two-panel raw time-domain chart (e.g. VNT/EGR actuator
    /// positions for selected tests).
    Transients(TransientsArgs),
    /// Render a torque curve chart with the area under the curve filled.
    Torque(TorqueArgs),
    /// Write synthetic demo CSVs (seeded, deterministic).
    Sample(SampleArgs),
}

/// Options shared by `align` and `compare`.
#[derive(Debug, Parser, Clone)]
pub struct CommonArgs {
    /// Input CSV (header row; whitespace around delimiters is tolerated).
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Name of the time-like column.
    #[arg(long, default_value = "Time")]
    pub time_col: String,

    /// Value column(s) to compare: quantity names or wide-file test numbers
    /// (comma-separated).
    #[arg(short = 'c', long = "col", value_delimiter = ',', required = true)]
    pub value_cols: Vec<String>,

    /// Percent-complete grid, as fractions (comma-separated).
    #[arg(long, value_delimiter = ',', default_values_t = [0.0, 0.25, 0.5, 0.75, 1.0])]
    pub grid: Vec<f64>,

    /// Unit conversion applied to compared values.
    #[arg(long, value_enum, default_value_t = Conversion::None)]
    pub convert: Conversion,

    /// Axis/report label for the compared quantity (defaults to the first
    /// value column name).
    #[arg(long)]
    pub label: Option<String>,

    /// Steady-state reference CSV (checkpoint baseline).
    #[arg(long)]
    pub steady_state: Option<PathBuf>,

    /// Percent column in the steady-state file (0–1 or 0–100).
    #[arg(long, default_value = "Percent")]
    pub steady_percent_col: String,

    /// Value column in the steady-state file (defaults to the first
    /// compared column's name).
    #[arg(long)]
    pub steady_value_col: Option<String>,

    /// Export aligned points to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the comparison (grid + point sets + baseline) to JSON.
    #[arg(long = "export-comparison")]
    pub export_comparison: Option<PathBuf>,

    /// Render the comparison chart to this SVG file.
    #[arg(long)]
    pub chart: Option<PathBuf>,

    /// Chart width (pixels).
    #[arg(long, default_value_t = 900)]
    pub width: u32,

    /// Chart height (pixels).
    #[arg(long, default_value_t = 600)]
    pub height: u32,
}

/// `align`: fixed, known transient duration.
#[derive(Debug, Parser)]
pub struct AlignArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Known elapsed time of the recorded transient (seconds).
    #[arg(short = 'd', long)]
    pub duration: f64,
}

/// `compare`: effective duration derived from a completion threshold.
#[derive(Debug, Parser)]
pub struct CompareArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// CSV holding the tracked quantity (defaults to the main input).
    #[arg(long)]
    pub tracked_input: Option<PathBuf>,

    /// Tracked column name. Omit for wide per-test files, where each run
    /// tracks the column with its own label in the tracked input.
    #[arg(long)]
    pub tracked_col: Option<String>,

    /// Completion threshold: duration is the first time the tracked value is
    /// strictly greater than this.
    #[arg(short = 't', long)]
    pub threshold: f64,
}

/// Options for re-rendering a saved comparison.
#[derive(Debug, Parser)]
pub struct ChartArgs {
    /// Comparison JSON produced by `align`/`compare --export-comparison`.
    #[arg(long, value_name = "JSON")]
    pub comparison: PathBuf,

    /// Output SVG path.
    #[arg(short = 'o', long)]
    pub out: PathBuf,

    /// Chart title.
    #[arg(long, default_value = "Transient comparison")]
    pub title: String,

    #[arg(long, default_value_t = 900)]
    pub width: u32,

    #[arg(long, default_value_t = 600)]
    pub height: u32,
}

/// Options for the two-panel raw transient chart.
#[derive(Debug, Parser)]
pub struct TransientsArgs {
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    #[arg(long, default_value = "Time")]
    pub time_col: String,

    /// Columns for the top panel (comma-separated).
    #[arg(long, value_delimiter = ',', required = true)]
    pub top_cols: Vec<String>,

    /// Columns for the bottom panel (comma-separated).
    #[arg(long, value_delimiter = ',', required = true)]
    pub bottom_cols: Vec<String>,

    /// Y label for the top panel.
    #[arg(long, default_value = "VNT Actuator Position (%)")]
    pub top_label: String,

    /// Y label for the bottom panel.
    #[arg(long, default_value = "EGR Actuator Position (%)")]
    pub bottom_label: String,

    /// Unit conversion applied to both panels (e.g. position-fraction).
    #[arg(long, value_enum, default_value_t = Conversion::None)]
    pub convert: Conversion,

    #[arg(long, default_value = "Transient actuator positions")]
    pub title: String,

    /// Output SVG path.
    #[arg(short = 'o', long)]
    pub out: PathBuf,

    #[arg(long, default_value_t = 750)]
    pub width: u32,

    #[arg(long, default_value_t = 900)]
    pub height: u32,
}

/// Options for the torque-curve chart.
#[derive(Debug, Parser)]
pub struct TorqueArgs {
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Engine speed column.
    #[arg(long, default_value = "Speed")]
    pub speed_col: String,

    /// Torque column.
    #[arg(long, default_value = "Torque")]
    pub torque_col: String,

    /// Unit conversion applied to torque values.
    #[arg(long, value_enum, default_value_t = Conversion::TorqueNm)]
    pub convert: Conversion,

    #[arg(long, default_value = "Torque curve")]
    pub title: String,

    /// Output SVG path.
    #[arg(short = 'o', long)]
    pub out: PathBuf,

    #[arg(long, default_value_t = 900)]
    pub width: u32,

    #[arg(long, default_value_t = 600)]
    pub height: u32,
}

/// Options for demo data generation.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Directory to write the demo CSVs into.
    #[arg(short = 'o', long, default_value = "demo-data")]
    pub out_dir: PathBuf,

    /// Random seed (generation is deterministic per seed).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of synthetic test runs.
    #[arg(long, default_value_t = 5)]
    pub runs: usize,

    /// Samples per run.
    #[arg(long, default_value_t = 60)]
    pub samples: usize,
}
