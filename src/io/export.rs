//! Export per-cell fit results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{FitResult, URow};
use crate::error::AppError;

const HEADER: &str = "u,column,status,n_valid,scale_min,scale_max,c0,c1,c2,c3,eq_scale,eq_value,message";

/// Write one CSV row per (U, column) cell.
pub fn write_results_csv(path: &Path, rows: &[URow]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| AppError::io("create export CSV", path, e))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{HEADER}").map_err(|e| AppError::io("write export CSV", path, e))?;
    for cell in rows.iter().flat_map(|r| r.cells.iter()) {
        writeln!(out, "{}", csv_row(cell)).map_err(|e| AppError::io("write export CSV", path, e))?;
    }
    out.flush().map_err(|e| AppError::io("write export CSV", path, e))?;

    Ok(())
}

fn csv_row(cell: &FitResult) -> String {
    let mut fields = vec![
        format!("{:.1}", cell.u),
        cell.column.label().to_string(),
        cell.status.label().to_string(),
        cell.n_valid.to_string(),
    ];

    match &cell.fit {
        Some(fit) => {
            fields.push(format!("{:.10}", fit.domain.0));
            fields.push(format!("{:.10}", fit.domain.1));
            fields.extend(fit.coefficients.iter().map(|c| format!("{c:.10}")));
        }
        None => fields.extend(std::iter::repeat_n(String::new(), 6)),
    }

    match cell.equilibrium {
        Some(eq) => {
            fields.push(format!("{:.10}", eq.scale));
            fields.push(format!("{:.10}", eq.value));
        }
        None => fields.extend([String::new(), String::new()]),
    }

    let message = match &cell.status {
        crate::domain::FitStatus::FitFailed(msg) => quote(msg),
        _ => String::new(),
    };
    fields.push(message);

    fields.join(",")
}

/// Quote a free-text field, doubling embedded quotes.
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, CubicFit, Equilibrium, FitStatus};

    #[test]
    fn ok_row_has_all_numeric_fields() {
        let cell = FitResult {
            u: 2.0,
            column: Column::Y,
            n_valid: 16,
            fit: Some(CubicFit {
                coefficients: [1.0, -3.0, 3.0, -1.0],
                domain: (0.95, 1.1),
                critical_points: vec![1.0],
            }),
            equilibrium: Some(Equilibrium { scale: 1.0, value: 0.0 }),
            status: FitStatus::Ok,
        };
        let row = csv_row(&cell);
        assert!(row.starts_with("2.0,y,ok,16,0.9500000000,1.1000000000,"));
        assert_eq!(row.split(',').count(), HEADER.split(',').count());
        assert!(row.ends_with(",1.0000000000,0.0000000000,"));
    }

    #[test]
    fn failed_row_keeps_column_count_and_quotes_message() {
        let cell = FitResult::rejected(0.0, Column::Z, 5, FitStatus::FitFailed("bad \"svd\"".into()));
        let row = csv_row(&cell);
        assert!(row.starts_with("0.0,z,fit_failed,5,,,,,,,,,"));
        assert!(row.ends_with("\"bad \"\"svd\"\"\""));
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fits.csv");
        let rows = vec![URow {
            u: 1.0,
            cells: Column::ALL
                .iter()
                .map(|&c| FitResult::rejected(1.0, c, 0, FitStatus::InsufficientData))
                .collect(),
        }];
        write_results_csv(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].starts_with("1.0,x,insufficient_data,0,"));
    }
}
