//! Per-dataset workflow shared by `eqs fit` and the integration tests.
//!
//! ingest -> fit every (U, column) cell -> write the fit report and lattice
//! summary -> optional JSON/CSV exports
//!
//! Printing is left to the caller.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::{AnalysisConfig, FitConfig, URow};
use crate::error::AppError;
use crate::fit::fit_groups;
use crate::io::{IngestedScan, load_scan_file, write_fits_json, write_results_csv};
use crate::report::{format_eqs_report, format_lattice_summary};

/// Computed outputs for one scan file.
#[derive(Debug, Clone)]
pub struct DatasetRun {
    pub input: PathBuf,
    pub scan: IngestedScan,
    pub rows: Vec<URow>,
    /// Files written, in write order.
    pub written: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum DatasetOutcome {
    /// The input file does not exist; nothing was written.
    Missing(PathBuf),
    Processed(DatasetRun),
}

/// Output paths derived from an input stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub eqs: PathBuf,
    pub lattice: PathBuf,
    pub json: PathBuf,
    pub csv: PathBuf,
}

impl OutputPaths {
    pub fn for_input(input: &Path, out_dir: &Path) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "scan".to_string());
        Self {
            eqs: out_dir.join(format!("{stem}_eqs.txt")),
            lattice: out_dir.join(format!("{stem}_lattice.txt")),
            json: out_dir.join(format!("{stem}_fits.json")),
            csv: out_dir.join(format!("{stem}_fits.csv")),
        }
    }
}

/// Ingest and fit a scan without writing anything.
pub fn analyze_scan(input: &Path, config: &FitConfig) -> Result<(IngestedScan, Vec<URow>), AppError> {
    let scan = load_scan_file(input)?;
    let rows = fit_groups(&scan.groups, config);
    Ok((scan, rows))
}

/// Process one dataset end to end.
pub fn run_dataset(input: &Path, config: &AnalysisConfig) -> Result<DatasetOutcome, AppError> {
    if !input.exists() {
        warn!(path = %input.display(), "input file does not exist, skipping");
        return Ok(DatasetOutcome::Missing(input.to_path_buf()));
    }

    let (scan, rows) = analyze_scan(input, &config.fit)?;
    if scan.lines_skipped > 0 {
        warn!(path = %input.display(), skipped = scan.lines_skipped, "skipped unusable lines");
    }

    fs::create_dir_all(&config.out_dir).map_err(|e| AppError::io("create output directory", &config.out_dir, e))?;
    let paths = OutputPaths::for_input(input, &config.out_dir);
    let mut written = Vec::new();

    write_text(&paths.eqs, &format_eqs_report(&rows))?;
    written.push(paths.eqs);
    write_text(&paths.lattice, &format_lattice_summary(&rows))?;
    written.push(paths.lattice);

    if config.export_json {
        write_fits_json(&paths.json, input, &config.fit, &rows)?;
        written.push(paths.json);
    }
    if config.export_csv {
        write_results_csv(&paths.csv, &rows)?;
        written.push(paths.csv);
    }

    let ok = rows.iter().flat_map(|r| &r.cells).filter(|c| c.status.is_ok()).count();
    info!(
        path = %input.display(),
        u_values = rows.len(),
        cells_ok = ok,
        cells = rows.len() * crate::domain::PROPERTY_COLUMNS,
        "dataset analysed"
    );

    Ok(DatasetOutcome::Processed(DatasetRun {
        input: input.to_path_buf(),
        scan,
        rows,
        written,
    }))
}

fn write_text(path: &Path, text: &str) -> Result<(), AppError> {
    fs::write(path, text).map_err(|e| AppError::io("write report", path, e))
}
