//! Lattice summary read-back.
//!
//! The lattice summary is the hand-off to the second templating pass: one row
//! per U value with an equilibrium scale (or `Error`) per column. The consumer
//! only ever wants `(U, scale)` pairs for one column and must omit any U whose
//! field is not a number. This module implements that reading so both sides
//! of the boundary are exercised by the same tests.

use std::fs;
use std::path::Path;

use crate::domain::{Column, PROPERTY_COLUMNS};
use crate::error::AppError;
use crate::report::SUMMARY_ERROR;

/// One parsed summary row.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeEntry {
    /// First token as written (`"Unknown"` for an empty row body).
    pub u_label: String,
    pub u: Option<f64>,
    /// `None` for `Error` or any other non-numeric field.
    pub scales: [Option<f64>; PROPERTY_COLUMNS],
}

/// `(U, scale)` pairs usable for one column, plus the rows that were omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSelection {
    pub accepted: Vec<(f64, f64)>,
    /// U labels of rows without a usable scale.
    pub omitted: Vec<String>,
}

impl ColumnSelection {
    /// Log lines in the wording the templating pass uses.
    pub fn omission_messages(&self) -> Vec<String> {
        self.omitted
            .iter()
            .map(|label| format!("{label} error found in scaling factor! Could not generate files!"))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatticeSummary {
    pub entries: Vec<LatticeEntry>,
}

impl LatticeSummary {
    pub fn select(&self, column: Column) -> ColumnSelection {
        let mut out = ColumnSelection::default();
        for entry in &self.entries {
            match (entry.u, entry.scales[column.index()]) {
                (Some(u), Some(scale)) => out.accepted.push((u, scale)),
                _ => out.omitted.push(entry.u_label.clone()),
            }
        }
        out
    }
}

pub fn read_lattice_summary(path: &Path) -> Result<LatticeSummary, AppError> {
    let text = fs::read_to_string(path).map_err(|e| AppError::io("read lattice summary", path, e))?;
    Ok(parse_lattice_summary(text.lines()))
}

/// Parse summary rows; blank lines are ignored, nothing else is rejected.
pub fn parse_lattice_summary<I, S>(lines: I) -> LatticeSummary
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let entries = lines
        .into_iter()
        .filter(|l| !l.as_ref().trim().is_empty())
        .map(|l| parse_entry(l.as_ref()))
        .collect();
    LatticeSummary { entries }
}

fn parse_entry(line: &str) -> LatticeEntry {
    let mut tokens = line.split_whitespace();
    let u_label = tokens.next().unwrap_or("Unknown").to_string();
    let u = u_label.parse::<f64>().ok();

    let mut scales = [None; PROPERTY_COLUMNS];
    for (slot, token) in scales.iter_mut().zip(tokens) {
        if token != SUMMARY_ERROR {
            *slot = token.parse::<f64>().ok();
        }
    }

    LatticeEntry { u_label, u, scales }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = "  0.0      1.01594121      1.01231000           Error
  1.0           Error      0.99871234      1.00012345

 10.0      1.02000000      1.02100000      1.02200000
";

    #[test]
    fn parses_rows_and_error_fields() {
        let summary = parse_lattice_summary(SUMMARY.lines());
        assert_eq!(summary.entries.len(), 3);
        assert_eq!(summary.entries[0].u, Some(0.0));
        assert_eq!(summary.entries[0].scales, [Some(1.01594121), Some(1.01231), None]);
        assert_eq!(summary.entries[2].u_label, "10.0");
    }

    #[test]
    fn error_fields_are_omitted_per_column() {
        let summary = parse_lattice_summary(SUMMARY.lines());

        let x = summary.select(Column::X);
        assert_eq!(x.accepted, vec![(0.0, 1.01594121), (10.0, 1.02)]);
        assert_eq!(x.omitted, vec!["1.0".to_string()]);
        assert_eq!(
            x.omission_messages(),
            vec!["1.0 error found in scaling factor! Could not generate files!".to_string()]
        );

        let z = summary.select(Column::Z);
        assert_eq!(z.omitted, vec!["0.0".to_string()]);
        assert_eq!(z.accepted.len(), 2);
    }

    #[test]
    fn short_and_unparsable_rows_are_omitted() {
        let summary = parse_lattice_summary(["2.0 1.0", "abc 1.0 1.0 1.0"]);
        let y = summary.select(Column::Y);
        assert!(y.accepted.is_empty());
        assert_eq!(y.omitted, vec!["2.0".to_string(), "abc".to_string()]);
    }
}
