//! Read/write fit JSON files.
//!
//! Fit JSON is the "portable" representation of a run:
//! - run metadata (tool, generation time, source scan, fitter policy)
//! - every (U, column) result with coefficients, domain and equilibrium
//!
//! The schema is defined by `domain::FitReportFile`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::Utc;

use crate::domain::{Column, FitConfig, FitReportFile, FitResult, URow};
use crate::error::{AppError, EXIT_IO};

/// Tool name recorded in exported files.
pub const TOOL_NAME: &str = "eqs";

/// Write a fit JSON file.
pub fn write_fits_json(path: &Path, source: &Path, config: &FitConfig, rows: &[URow]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| AppError::io("create fit JSON", path, e))?;

    let report = FitReportFile {
        tool: TOOL_NAME.to_string(),
        generated_at: Utc::now(),
        source: source.to_path_buf(),
        config: config.clone(),
        rows: rows.to_vec(),
    };

    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, &report)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write fit JSON: {e}")))?;
    out.flush().map_err(|e| AppError::io("write fit JSON", path, e))?;

    Ok(())
}

/// Read a fit JSON file.
pub fn read_fits_json(path: &Path) -> Result<FitReportFile, AppError> {
    let file = File::open(path).map_err(|e| AppError::io("open fit JSON", path, e))?;
    let report: FitReportFile = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(EXIT_IO, format!("Invalid fit JSON: {e}")))?;
    Ok(report)
}

impl FitReportFile {
    /// Look up the result for one cell. U matches exactly, as in grouping.
    pub fn cell(&self, u: f64, column: Column) -> Option<&FitResult> {
        self.rows
            .iter()
            .find(|row| row.u == u)
            .and_then(|row| row.cells.iter().find(|c| c.column == column))
    }
}
