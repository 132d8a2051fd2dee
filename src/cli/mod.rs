//! Command-line parsing for the lattice-scale extractor.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fitting and reporting code; `app` turns parsed arguments into configs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Column;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "eqs", version, about = "Equilibrium lattice scale extraction from energy scans")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Silence all logging.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also write logs to this file.
    #[arg(long, global = true, env = "EQS_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit every (U, column) series and write the fit report and lattice summary.
    Fit(FitArgs),
    /// Read a lattice summary and list the usable scales of one column.
    Lattice(LatticeArgs),
    /// Plot one (U, column) fit as ASCII.
    Plot(PlotArgs),
    /// Write a synthetic scan file.
    Synth(SynthArgs),
}

/// Fitter tunables shared by `fit` and `plot`.
#[derive(Debug, Args, Clone)]
pub struct FitterArgs {
    /// Minimum number of valid points per series.
    #[arg(long, default_value_t = 4)]
    pub min_points: usize,

    /// Decimals used when checking for repeated values.
    #[arg(long, default_value_t = 4)]
    pub round_decimals: u32,

    /// Reject a series when one rounded value covers more than this fraction.
    #[arg(long, default_value_t = 0.5)]
    pub degenerate_fraction: f64,
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Scan files to process, one dataset each.
    #[arg(
        short,
        long = "input",
        value_name = "SCAN",
        env = "EQS_INPUTS",
        value_delimiter = ',',
        default_values = ["results/clean/u.txt", "results/clean/d3u.txt"]
    )]
    pub inputs: Vec<PathBuf>,

    /// Directory for the report files.
    #[arg(long, env = "EQS_OUT_DIR", default_value = "results/analysis")]
    pub out_dir: PathBuf,

    #[command(flatten)]
    pub fitter: FitterArgs,

    /// Also write `<stem>_fits.json`.
    #[arg(long)]
    pub export_json: bool,

    /// Also write `<stem>_fits.csv`.
    #[arg(long)]
    pub export_csv: bool,

    /// Print a per-dataset table to stdout.
    #[arg(long)]
    pub summary: bool,
}

#[derive(Debug, Args, Clone)]
pub struct LatticeArgs {
    /// Lattice summary file (`<stem>_lattice.txt`).
    pub file: PathBuf,

    /// Column to select.
    #[arg(long, value_enum, default_value_t = Column::X)]
    pub column: Column,
}

#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Scan file to refit.
    #[arg(long, value_name = "SCAN", conflicts_with = "fits", required_unless_present = "fits")]
    pub input: Option<PathBuf>,

    /// Fit JSON written by `eqs fit --export-json`.
    #[arg(long, value_name = "JSON")]
    pub fits: Option<PathBuf>,

    /// U value of the cell.
    #[arg(long, allow_negative_numbers = true)]
    pub u: f64,

    #[arg(long, value_enum, default_value_t = Column::X)]
    pub column: Column,

    #[command(flatten)]
    pub fitter: FitterArgs,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct SynthArgs {
    /// Output scan file.
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub u_min: f64,
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub u_max: f64,
    #[arg(long, default_value_t = 1.0)]
    pub u_step: f64,

    #[arg(long, default_value_t = 0.95)]
    pub scale_min: f64,
    #[arg(long, default_value_t = 1.10)]
    pub scale_max: f64,
    #[arg(long, default_value_t = 0.01)]
    pub scale_step: f64,

    /// Standard deviation of the energy noise.
    #[arg(long, default_value_t = 1e-4)]
    pub noise: f64,

    /// Probability of writing `error` instead of a value.
    #[arg(long, default_value_t = 0.0)]
    pub error_prob: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
