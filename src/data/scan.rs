//! Synthetic lattice scans in the upstream scan-file format.
//!
//! Each (U, column) series is an anharmonic well
//! `E(s) = E0 + k (s - s0)^2 + a (s - s0)^3 + noise` whose centre `s0` drifts
//! with U and column, so a fit over the scan recovers a known equilibrium.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::Column;
use crate::error::{AppError, EXIT_INTERNAL, EXIT_IO};
use crate::fit::round_to;
use crate::io::ERROR_TOKEN;

/// Upper bound on generated grid points per axis.
const MAX_GRID_POINTS: usize = 100_000;

/// Generator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub u_min: f64,
    pub u_max: f64,
    pub u_step: f64,
    pub scale_min: f64,
    pub scale_max: f64,
    pub scale_step: f64,
    /// Standard deviation of the additive energy noise.
    pub noise: f64,
    /// Probability that a single value is written as `error`.
    pub error_prob: f64,
    pub seed: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            u_min: 0.0,
            u_max: 10.0,
            u_step: 1.0,
            scale_min: 0.95,
            scale_max: 1.10,
            scale_step: 0.01,
            noise: 1e-4,
            error_prob: 0.0,
            seed: 42,
        }
    }
}

impl SynthConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        check_axis("U", self.u_min, self.u_max, self.u_step)?;
        check_axis("scale", self.scale_min, self.scale_max, self.scale_step)?;
        if !(self.noise.is_finite() && self.noise >= 0.0) {
            return Err(AppError::new(EXIT_IO, "Noise must be a finite value >= 0."));
        }
        if !(0.0..=1.0).contains(&self.error_prob) {
            return Err(AppError::new(EXIT_IO, "Error probability must be within [0, 1]."));
        }
        Ok(())
    }
}

fn check_axis(name: &str, min: f64, max: f64, step: f64) -> Result<(), AppError> {
    if !(min.is_finite() && max.is_finite() && step.is_finite() && step > 0.0 && max >= min) {
        return Err(AppError::new(EXIT_IO, format!("Invalid {name} grid: [{min}, {max}] step {step}.")));
    }
    if (max - min) / step >= MAX_GRID_POINTS as f64 {
        return Err(AppError::new(EXIT_IO, format!("{name} grid has too many points.")));
    }
    Ok(())
}

/// Generated scan plus a count of injected `error` tokens.
#[derive(Debug, Clone, Default)]
pub struct SynthScan {
    pub lines: Vec<String>,
    pub error_tokens: usize,
}

impl SynthScan {
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Inclusive grid `min, min + step, ..., max`, rounded to `decimals`.
pub fn grid(min: f64, max: f64, step: f64, decimals: u32) -> Vec<f64> {
    let n = ((max - min) / step + 1e-9).floor() as usize + 1;
    (0..n).map(|i| round_to(min + i as f64 * step, decimals)).collect()
}

/// Equilibrium scale the generator places for `(u, column)`.
pub fn well_center(u: f64, column: Column) -> f64 {
    1.0 + 0.002 * u + 0.01 * column.index() as f64
}

/// Noise-free energy of the well at scale `s`.
pub fn well_energy(u: f64, column: Column, s: f64) -> f64 {
    let e0 = -10.0 - 0.5 * u - column.index() as f64;
    let k = 40.0 + 2.0 * u;
    let a = -60.0;
    let d = s - well_center(u, column);
    e0 + k * d * d + a * d * d * d
}

pub fn generate_scan(config: &SynthConfig) -> Result<SynthScan, AppError> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.noise)
        .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Noise distribution error: {e}")))?;

    let us = grid(config.u_min, config.u_max, config.u_step, 6);
    let scales = grid(config.scale_min, config.scale_max, config.scale_step, 2);

    let mut scan = SynthScan::default();
    for &u in &us {
        for &s in &scales {
            let mut line = format!("{u:.1} {s:.2}");
            for column in Column::ALL {
                if rng.gen_bool(config.error_prob) {
                    scan.error_tokens += 1;
                    let _ = write!(line, " {ERROR_TOKEN}");
                } else {
                    let e = well_energy(u, column, s) + normal.sample(&mut rng);
                    let _ = write!(line, " {e:.8}");
                }
            }
            scan.lines.push(line);
        }
    }
    Ok(scan)
}

pub fn write_scan_file(path: &Path, scan: &SynthScan) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| AppError::io("create directory", parent, e))?;
    }
    fs::write(path, scan.to_text()).map_err(|e| AppError::io("write scan file", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FitConfig;
    use crate::fit::fit_groups;
    use crate::io::parse_scan;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_grids_match_upstream_scan() {
        let c = SynthConfig::default();
        let scales = grid(c.scale_min, c.scale_max, c.scale_step, 2);
        assert_eq!(scales.len(), 16);
        assert_eq!(scales[0], 0.95);
        assert_eq!(scales[5], 1.0);
        assert_eq!(scales[15], 1.1);
        assert_eq!(grid(c.u_min, c.u_max, c.u_step, 6).len(), 11);
    }

    #[test]
    fn same_seed_same_scan() {
        let c = SynthConfig { error_prob: 0.2, ..SynthConfig::default() };
        let a = generate_scan(&c).unwrap();
        let b = generate_scan(&c).unwrap();
        assert_eq!(a.lines, b.lines);
        assert_eq!(a.lines.len(), 11 * 16);
        assert!(a.lines[0].starts_with("0.0 0.95 "));
    }

    #[test]
    fn error_probability_one_writes_only_tokens() {
        let c = SynthConfig { error_prob: 1.0, u_max: 0.0, ..SynthConfig::default() };
        let scan = generate_scan(&c).unwrap();
        assert_eq!(scan.error_tokens, 16 * 3);
        assert!(scan.lines.iter().all(|l| l.ends_with("error error error")));
    }

    #[test]
    fn fit_recovers_generated_centres() {
        let scan = generate_scan(&SynthConfig::default()).unwrap();
        let ingested = parse_scan(&scan.lines);
        let rows = fit_groups(&ingested.groups, &FitConfig::default());
        assert_eq!(rows.len(), 11);
        for row in &rows {
            for cell in &row.cells {
                let eq = cell.equilibrium.expect("equilibrium");
                assert_abs_diff_eq!(eq.scale, well_center(row.u, cell.column), epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn invalid_settings_are_usage_errors() {
        let bad_step = SynthConfig { scale_step: 0.0, ..SynthConfig::default() };
        assert_eq!(generate_scan(&bad_step).unwrap_err().exit_code(), EXIT_IO);
        let bad_prob = SynthConfig { error_prob: 1.5, ..SynthConfig::default() };
        assert_eq!(generate_scan(&bad_prob).unwrap_err().exit_code(), EXIT_IO);
    }

    #[test]
    fn writes_scan_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean").join("u.txt");
        let scan = generate_scan(&SynthConfig { u_max: 1.0, ..SynthConfig::default() }).unwrap();
        write_scan_file(&path, &scan).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 32);
    }
}
