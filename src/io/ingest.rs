//! Scan-file ingest.
//!
//! This module turns the whitespace-delimited energy scans written by the
//! upstream workflow into per-U groups of samples that are safe to fit.
//!
//! Design goals:
//! - **Lenient records**: a malformed line is skipped, a malformed value is
//!   marked absent; nothing in a record can fail the run
//! - **Exact grouping**: U values group by float equality, no binning
//! - **Separation of concerns**: no fitting logic here

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::domain::{Sample, ScanGroups};
use crate::error::AppError;

/// Token the upstream workflow writes for a failed calculation.
pub const ERROR_TOKEN: &str = "error";

/// Ingest output: grouped samples + line accounting.
#[derive(Debug, Clone, Default)]
pub struct IngestedScan {
    pub groups: ScanGroups,
    /// Non-blank lines seen.
    pub lines_read: usize,
    /// Non-blank lines dropped because U or scale was missing or unusable.
    pub lines_skipped: usize,
}

/// Read and group a scan file.
pub fn load_scan_file(path: &Path) -> Result<IngestedScan, AppError> {
    let text = fs::read_to_string(path).map_err(|e| AppError::io("read scan file", path, e))?;
    let scan = parse_scan(text.lines());
    debug!(
        path = %path.display(),
        lines = scan.lines_read,
        skipped = scan.lines_skipped,
        groups = scan.groups.len(),
        "ingested scan file"
    );
    Ok(scan)
}

/// Group an iterator of raw lines.
pub fn parse_scan<I, S>(lines: I) -> IngestedScan
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scan = IngestedScan::default();
    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        scan.lines_read += 1;

        let accepted = parse_line(line).is_some_and(|sample| scan.groups.insert(sample));
        if !accepted {
            scan.lines_skipped += 1;
        }
    }
    scan
}

/// Parse one record: `U scale [value ...]`.
///
/// Returns `None` when U or scale is missing or not a number.
pub fn parse_line(line: &str) -> Option<Sample> {
    let mut tokens = line.split_whitespace();
    let u = parse_number(tokens.next()?)?;
    let scale = parse_number(tokens.next()?)?;
    let properties = tokens.map(parse_value).collect();
    Some(Sample { u, scale, properties })
}

/// Property token -> value; `error` and anything non-numeric become `None`.
pub fn parse_value(token: &str) -> Option<f64> {
    if token == ERROR_TOKEN {
        return None;
    }
    parse_number(token)
}

fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_record() {
        let s = parse_line("2.0 0.98 -10.5 -10.4 -10.6").unwrap();
        assert_eq!(s.u, 2.0);
        assert_eq!(s.scale, 0.98);
        assert_eq!(s.properties, vec![Some(-10.5), Some(-10.4), Some(-10.6)]);
    }

    #[test]
    fn error_and_garbage_values_are_absent() {
        let s = parse_line("1.0\t1.01  error  NaN?  -3e1").unwrap();
        assert_eq!(s.properties, vec![None, None, Some(-30.0)]);
    }

    #[test]
    fn missing_or_bad_keys_skip_the_line() {
        assert!(parse_line("").is_none());
        assert!(parse_line("1.0").is_none());
        assert!(parse_line("U scale x y z").is_none());
        assert!(parse_line("1.0 error 1 2 3").is_none());
    }

    #[test]
    fn record_without_values_is_kept() {
        let s = parse_line("1.0 0.95").unwrap();
        assert!(s.properties.is_empty());
    }

    #[test]
    fn equal_floats_in_different_spellings_share_a_group() {
        let scan = parse_scan(["2 0.95 1 1 1", "2.0 0.96 1 1 1", "2.00 0.97 1 1 1", "+2e0 0.98 1 1 1"]);
        assert_eq!(scan.groups.len(), 1);
        assert_eq!(scan.groups.get(2.0).map(<[Sample]>::len), Some(4));
    }

    #[test]
    fn near_equal_u_values_stay_apart() {
        let scan = parse_scan(["2.0 0.95 1", "2.0000001 0.95 1"]);
        assert_eq!(scan.groups.len(), 2);
    }

    #[test]
    fn line_accounting_ignores_blank_lines() {
        let scan = parse_scan(["", "1.0 0.95 1 2 3", "   ", "header line", "nan 0.95 1 2 3"]);
        assert_eq!(scan.lines_read, 3);
        assert_eq!(scan.lines_skipped, 2);
        assert_eq!(scan.groups.sample_count(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_scan_file(Path::new("definitely/not/here.txt")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_IO);
    }
}
