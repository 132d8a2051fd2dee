//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs logging
//! - runs the fit pipeline per dataset and prints where reports went
//! - reads lattice summaries, plots cells, writes synthetic scans

use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

use crate::cli::{Cli, Command, FitArgs, FitterArgs, LatticeArgs, PlotArgs, SynthArgs};
use crate::data::{SynthConfig, generate_scan, write_scan_file};
use crate::domain::{AnalysisConfig, FitConfig, FitResult};
use crate::error::{AppError, EXIT_IO, EXIT_NO_DATA};

pub mod pipeline;

use pipeline::DatasetOutcome;

/// Entry point for the `eqs` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    crate::logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Lattice(args) => handle_lattice(args),
        Command::Plot(args) => handle_plot(args),
        Command::Synth(args) => handle_synth(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args)?;

    let mut written: Vec<PathBuf> = Vec::new();
    for input in &config.inputs {
        match pipeline::run_dataset(input, &config)? {
            DatasetOutcome::Missing(path) => {
                println!("File {} does not exist.", path.display());
            }
            DatasetOutcome::Processed(run) => {
                if config.print_summary {
                    let label = run.input.display().to_string();
                    println!("{}", crate::report::format_run_summary(&label, &run.scan, &run.rows));
                }
                written.extend(run.written);
            }
        }
    }

    print!("{}", crate::report::format_completion(&written));
    Ok(())
}

fn handle_lattice(args: LatticeArgs) -> Result<(), AppError> {
    let summary = crate::io::read_lattice_summary(&args.file)?;
    let selection = summary.select(args.column);
    debug!(
        accepted = selection.accepted.len(),
        omitted = selection.omitted.len(),
        "lattice summary read"
    );
    print!("{}", crate::report::format_lattice_selection(&selection, args.column));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let plot = match (&args.input, &args.fits) {
        (_, Some(fits)) => {
            let report = crate::io::read_fits_json(fits)?;
            let cell = report.cell(args.u, args.column).ok_or_else(|| missing_cell(&args))?;
            crate::plot::render_cell_plot_fit_only(cell, args.width, args.height)
        }
        (Some(input), None) => {
            let config = fit_config_from_args(&args.fitter)?;
            let scan = crate::io::load_scan_file(input)?;
            let samples = scan.groups.get(args.u).ok_or_else(|| missing_cell(&args))?;
            let cell: FitResult = crate::fit::fit_cell(args.u, args.column, samples, &config);
            let (scales, values) = crate::fit::valid_pairs(samples, args.column.index());
            let points: Vec<(f64, f64)> = scales.into_iter().zip(values).collect();
            crate::plot::render_cell_plot(&points, &cell, args.width, args.height)
        }
        (None, None) => return Err(AppError::new(EXIT_IO, "Either --input or --fits is required.")),
    };

    println!("{plot}");
    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let config = SynthConfig {
        u_min: args.u_min,
        u_max: args.u_max,
        u_step: args.u_step,
        scale_min: args.scale_min,
        scale_max: args.scale_max,
        scale_step: args.scale_step,
        noise: args.noise,
        error_prob: args.error_prob,
        seed: args.seed,
    };
    let scan = generate_scan(&config)?;
    write_scan_file(&args.output, &scan)?;
    println!(
        "Wrote {} lines ({} error values) to {}",
        scan.lines.len(),
        scan.error_tokens,
        args.output.display()
    );
    Ok(())
}

fn missing_cell(args: &PlotArgs) -> AppError {
    AppError::new(
        EXIT_NO_DATA,
        format!("No data for U={} column {}.", args.u, args.column.label()),
    )
}

pub fn fit_config_from_args(args: &FitterArgs) -> Result<FitConfig, AppError> {
    let config = FitConfig {
        min_points: args.min_points,
        round_decimals: args.round_decimals,
        degenerate_fraction: args.degenerate_fraction,
    };
    config.validate()?;
    Ok(config)
}

pub fn analysis_config_from_args(args: &FitArgs) -> Result<AnalysisConfig, AppError> {
    Ok(AnalysisConfig {
        inputs: args.inputs.clone(),
        out_dir: args.out_dir.clone(),
        fit: fit_config_from_args(&args.fitter)?,
        export_json: args.export_json,
        export_csv: args.export_csv,
        print_summary: args.summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitter_flags_become_config() {
        let args = FitterArgs {
            min_points: 6,
            round_decimals: 3,
            degenerate_fraction: 0.75,
        };
        let config = fit_config_from_args(&args).unwrap();
        assert_eq!(config.min_points, 6);
        assert_eq!(config.round_decimals, 3);
        assert_eq!(config.degenerate_fraction, 0.75);
    }

    #[test]
    fn invalid_fitter_flags_are_rejected() {
        let args = FitterArgs {
            min_points: 3,
            round_decimals: 4,
            degenerate_fraction: 0.5,
        };
        assert!(fit_config_from_args(&args).is_err());
    }
}
