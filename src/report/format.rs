//! Report formatting: the per-property fit report, the lattice summary and
//! terminal tables.
//!
//! Critical points are listed in ascending scale order, which is also the
//! order the equilibrium selection visits them in.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (the two report files are consumed by other
//!   tools and must stay byte-stable)

use std::path::PathBuf;

use crate::domain::{Column, FitResult, FitStatus, URow};
use crate::io::{ColumnSelection, IngestedScan};

/// Summary-field marker for a cell without an equilibrium.
pub const SUMMARY_ERROR: &str = "Error";

pub const MSG_INSUFFICIENT: &str = "Error! insufficient valid data for fit!";
pub const MSG_DEGENERATE: &str = "Error! all y values are the same!";
pub const MSG_NO_MINIMUM: &str = "Error! no valid minimum found!";

/// Width of each scale field in the lattice summary.
const SUMMARY_FIELD_WIDTH: usize = 14;

/// Format the per-property fit report (`*_eqs.txt`).
pub fn format_eqs_report(rows: &[URow]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!("{:.1}\n", row.u));
        for column in Column::ALL {
            match row.cells.iter().find(|c| c.column == column) {
                Some(cell) => push_cell_report(&mut out, cell),
                None => push_line(&mut out, MSG_INSUFFICIENT),
            }
        }
    }
    out
}

fn push_cell_report(out: &mut String, cell: &FitResult) {
    match &cell.status {
        FitStatus::InsufficientData => return push_line(out, MSG_INSUFFICIENT),
        FitStatus::DegenerateData => return push_line(out, MSG_DEGENERATE),
        FitStatus::FitFailed(message) => return push_line(out, &format!("Fit failed: {message}")),
        FitStatus::Ok | FitStatus::NoMinimumFound => {}
    }

    let Some(fit) = &cell.fit else {
        return push_line(out, MSG_NO_MINIMUM);
    };
    let [c0, c1, c2, c3] = fit.coefficients;
    push_line(out, &format!("y = {c0:.8}*x^3 + {c1:.8}*x^2 + {c2:.8}*x + {c3:.8}"));
    push_line(out, &format!("# J range: {:.8} to {:.8}", fit.domain.0, fit.domain.1));
    push_line(out, &format!("# Critical points: {}", fmt_points(&fit.critical_points)));

    match cell.equilibrium {
        Some(eq) => push_line(out, &format!("{:.8} {:.8}", eq.scale, eq.value)),
        None => push_line(out, MSG_NO_MINIMUM),
    }
}

/// Format the lattice summary (`*_lattice.txt`): always one field per column.
pub fn format_lattice_summary(rows: &[URow]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!("{:5.1}", row.u));
        for column in Column::ALL {
            let field = row
                .cells
                .iter()
                .find(|c| c.column == column)
                .map(summary_field)
                .unwrap_or_else(|| SUMMARY_ERROR.to_string());
            out.push_str(&format!("  {field:>SUMMARY_FIELD_WIDTH$}"));
        }
        out.push('\n');
    }
    out
}

/// Equilibrium scale at 8 decimals, or `Error`.
pub fn summary_field(cell: &FitResult) -> String {
    match (&cell.status, cell.equilibrium) {
        (FitStatus::Ok, Some(eq)) => format!("{:.8}", eq.scale),
        _ => SUMMARY_ERROR.to_string(),
    }
}

/// Terminal overview of one dataset.
pub fn format_run_summary(label: &str, scan: &IngestedScan, rows: &[URow]) -> String {
    let mut out = String::new();

    let cells = rows.iter().flat_map(|r| r.cells.iter());
    let total = cells.clone().count();
    let ok = cells.filter(|c| c.status.is_ok()).count();

    out.push_str(&format!("=== eqs - {label} ===\n"));
    out.push_str(&format!(
        "Lines: read={} skipped={} | U values={} | samples={}\n",
        scan.lines_read,
        scan.lines_skipped,
        scan.groups.len(),
        scan.groups.sample_count(),
    ));
    out.push_str(&format!("Cells: {ok}/{total} with an equilibrium\n\n"));

    out.push_str(format!("{:>6} {:>16} {:>16} {:>16}", "U", "x", "y", "z").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<6} {:-<16} {:-<16} {:-<16}", "", "", "", "").trim_end());
    out.push('\n');

    for row in rows {
        let fields: Vec<String> = row.cells.iter().map(table_field).collect();
        out.push_str(&format!("{:>6.1}", row.u));
        for f in fields {
            out.push_str(&format!(" {f:>16}"));
        }
        out.push('\n');
    }

    out
}

/// Closing message of `eqs fit`: one `- <path>` line per written file.
pub fn format_completion(written: &[PathBuf]) -> String {
    let mut out = String::from("Analysis complete. Output written to:\n");
    for path in written {
        out.push_str(&format!("- {}\n", path.display()));
    }
    out
}

/// Terminal listing for `eqs lattice`.
pub fn format_lattice_selection(selection: &ColumnSelection, column: Column) -> String {
    let mut out = String::new();
    out.push_str(&format!("Column {}: {} usable row(s)\n", column.label(), selection.accepted.len()));
    for (u, scale) in &selection.accepted {
        out.push_str(&format!("{u:5.1}  {scale:.8}\n"));
    }
    for message in selection.omission_messages() {
        out.push_str(&message);
        out.push('\n');
    }
    if selection.omitted.is_empty() {
        out.push_str("No errors found.\n");
    } else {
        out.push_str(&format!("{} error(s) found.\n", selection.omitted.len()));
    }
    out
}

fn table_field(cell: &FitResult) -> String {
    match cell.equilibrium_scale() {
        Some(scale) if cell.status.is_ok() => format!("{scale:.8}"),
        _ => cell.status.label().to_string(),
    }
}

fn fmt_points(points: &[f64]) -> String {
    let parts: Vec<String> = points.iter().map(|p| format!("{p:.8}")).collect();
    parts.join(", ")
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
