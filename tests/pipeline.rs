use std::fs;
use std::path::Path;

use approx::assert_abs_diff_eq;
use eqs_lattice::app::pipeline::{DatasetOutcome, run_dataset};
use eqs_lattice::data::{SynthConfig, generate_scan, well_center, write_scan_file};
use eqs_lattice::domain::{AnalysisConfig, Column, FitConfig, FitStatus};
use eqs_lattice::io::{read_fits_json, read_lattice_summary};
use eqs_lattice::report::{MSG_DEGENERATE, MSG_INSUFFICIENT};

const SCAN: &str = "\
2.0 0.95 10.0 error 5.0
2.0 0.98 8.0  error 5.0
2.0 1.00 6.0  error 5.0
this line is not a record
2.0 1.03 6.5  error 5.0

2.0 1.05 9.0  error 5.0
";

fn config(out_dir: &Path) -> AnalysisConfig {
    AnalysisConfig {
        inputs: vec![],
        out_dir: out_dir.to_path_buf(),
        fit: FitConfig::default(),
        export_json: true,
        export_csv: true,
        print_summary: false,
    }
}

#[test]
fn handwritten_scan_produces_both_reports() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("u.txt");
    fs::write(&input, SCAN).unwrap();
    let out_dir = dir.path().join("analysis");

    let DatasetOutcome::Processed(run) = run_dataset(&input, &config(&out_dir)).unwrap() else {
        panic!("input exists");
    };
    assert_eq!(run.scan.lines_read, 6);
    assert_eq!(run.scan.lines_skipped, 1);
    assert_eq!(run.written.len(), 4);

    let eqs = fs::read_to_string(out_dir.join("u_eqs.txt")).unwrap();
    let lines: Vec<&str> = eqs.lines().collect();
    assert_eq!(lines.len(), 1 + 4 + 1 + 1);
    assert_eq!(lines[0], "2.0");
    assert!(lines[1].starts_with("y = "));
    assert_eq!(lines[2], "# J range: 0.95000000 to 1.05000000");
    assert!(lines[4].starts_with("1.0159"), "equilibrium line: {}", lines[4]);
    assert_eq!(lines[5], MSG_INSUFFICIENT);
    assert_eq!(lines[6], MSG_DEGENERATE);

    let summary = read_lattice_summary(&out_dir.join("u_lattice.txt")).unwrap();
    assert_eq!(summary.entries.len(), 1);
    let x = summary.select(Column::X);
    assert_eq!(x.accepted.len(), 1);
    assert_abs_diff_eq!(x.accepted[0].1, 1.0159, epsilon = 1e-4);
    let y = summary.select(Column::Y);
    assert_eq!(y.omitted, vec!["2.0".to_string()]);

    let report = read_fits_json(&out_dir.join("u_fits.json")).unwrap();
    assert_eq!(report.source, input);
    assert_eq!(report.cell(2.0, Column::Z).unwrap().status, FitStatus::DegenerateData);

    let csv = fs::read_to_string(out_dir.join("u_fits.csv")).unwrap();
    assert_eq!(csv.lines().count(), 1 + 3);
}

#[test]
fn synthetic_scan_round_trips_through_the_lattice_summary() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("clean").join("d3u.txt");
    let scan = generate_scan(&SynthConfig { error_prob: 0.05, ..SynthConfig::default() }).unwrap();
    write_scan_file(&input, &scan).unwrap();

    let out_dir = dir.path().join("analysis");
    let outcome = run_dataset(&input, &config(&out_dir)).unwrap();
    assert!(matches!(outcome, DatasetOutcome::Processed(_)));

    let summary = read_lattice_summary(&out_dir.join("d3u_lattice.txt")).unwrap();
    assert_eq!(summary.entries.len(), 11);
    for column in Column::ALL {
        let selection = summary.select(column);
        for (u, scale) in selection.accepted {
            assert_abs_diff_eq!(scale, well_center(u, column), epsilon = 2e-3);
        }
    }
}

#[test]
fn missing_dataset_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = run_dataset(&dir.path().join("u.txt"), &config(dir.path())).unwrap();
    let DatasetOutcome::Missing(path) = outcome else {
        panic!("expected a missing dataset");
    };
    assert!(path.ends_with("u.txt"));
    assert!(!dir.path().join("u_eqs.txt").exists());
}
