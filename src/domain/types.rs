//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, EXIT_IO};

/// Number of property columns fitted per U value (and printed per summary row).
pub const PROPERTY_COLUMNS: usize = 3;

/// A property column of the scan, named after the strain direction it samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    X,
    Y,
    Z,
}

impl Column {
    pub const ALL: [Column; PROPERTY_COLUMNS] = [Column::X, Column::Y, Column::Z];

    /// Zero-based index into a sample's property vector.
    pub fn index(self) -> usize {
        match self {
            Column::X => 0,
            Column::Y => 1,
            Column::Z => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Column::X => "x",
            Column::Y => "y",
            Column::Z => "z",
        }
    }
}

/// One parsed scan record.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub u: f64,
    pub scale: f64,
    /// `None` marks a value the source flagged as `error` or that did not parse.
    pub properties: Vec<Option<f64>>,
}

impl Sample {
    /// Property value at `idx`; a missing trailing token reads as absent.
    pub fn property(&self, idx: usize) -> Option<f64> {
        self.properties.get(idx).copied().flatten()
    }
}

/// Grouping key for U values.
///
/// Two keys are equal exactly when their floats compare equal, so `2`, `2.0`
/// and `2e0` share a bucket while `2.0000001` does not. Non-finite values are
/// rejected because they cannot be ordered or compared reliably.
#[derive(Debug, Clone, Copy)]
pub struct UKey(f64);

impl UKey {
    pub fn new(u: f64) -> Option<Self> {
        if u.is_finite() {
            // Folds -0.0 into 0.0 so the total order agrees with `==`.
            Some(Self(u + 0.0))
        } else {
            None
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for UKey {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for UKey {}

impl PartialOrd for UKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Samples bucketed by U value, iterated in ascending U order.
#[derive(Debug, Clone, Default)]
pub struct ScanGroups {
    groups: BTreeMap<UKey, Vec<Sample>>,
}

impl ScanGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sample to its U bucket. Returns `false` (and drops the sample) if
    /// its U value cannot be used as a key.
    pub fn insert(&mut self, sample: Sample) -> bool {
        let Some(key) = UKey::new(sample.u) else {
            return false;
        };
        self.groups.entry(key).or_default().push(sample);
        true
    }

    pub fn get(&self, u: f64) -> Option<&[Sample]> {
        let key = UKey::new(u)?;
        self.groups.get(&key).map(Vec::as_slice)
    }

    /// Ascending-U iteration over `(u, samples)`.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &[Sample])> {
        self.groups.iter().map(|(k, v)| (k.value(), v.as_slice()))
    }

    pub fn u_values(&self) -> Vec<f64> {
        self.groups.keys().map(|k| k.value()).collect()
    }

    /// Number of distinct U values.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn sample_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Outcome of fitting a single (U, column) cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FitStatus {
    Ok,
    /// Fewer valid points than the configured minimum.
    InsufficientData,
    /// Too many values collapse to one rounded value.
    DegenerateData,
    /// The fit succeeded but no critical point lies inside the observed scales.
    NoMinimumFound,
    /// The least-squares solve failed; carries the solver's message.
    FitFailed(String),
}

impl FitStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, FitStatus::Ok)
    }

    /// Short machine-friendly label (CSV exports, terminal tables).
    pub fn label(&self) -> &'static str {
        match self {
            FitStatus::Ok => "ok",
            FitStatus::InsufficientData => "insufficient_data",
            FitStatus::DegenerateData => "degenerate_data",
            FitStatus::NoMinimumFound => "no_minimum",
            FitStatus::FitFailed(_) => "fit_failed",
        }
    }
}

/// Fitted cubic and its derivative analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubicFit {
    /// `[c0, c1, c2, c3]` for `c0*s^3 + c1*s^2 + c2*s + c3`.
    pub coefficients: [f64; 4],
    /// Closed range of the scales that went into the fit.
    pub domain: (f64, f64),
    /// Every real root of the derivative, in or out of the domain.
    pub critical_points: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equilibrium {
    pub scale: f64,
    pub value: f64,
}

/// Fit output for a single (U, column) cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub u: f64,
    pub column: Column,
    /// Number of `(scale, value)` pairs that survived filtering.
    pub n_valid: usize,
    pub fit: Option<CubicFit>,
    pub equilibrium: Option<Equilibrium>,
    pub status: FitStatus,
}

impl FitResult {
    /// A result for a cell that was rejected before fitting.
    pub fn rejected(u: f64, column: Column, n_valid: usize, status: FitStatus) -> Self {
        Self {
            u,
            column,
            n_valid,
            fit: None,
            equilibrium: None,
            status,
        }
    }

    pub fn equilibrium_scale(&self) -> Option<f64> {
        self.equilibrium.map(|eq| eq.scale)
    }
}

/// Fit results for one U value, in fixed column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct URow {
    pub u: f64,
    pub cells: Vec<FitResult>,
}

/// Numerical policy knobs of the fitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Minimum number of valid points required before a cubic is fitted.
    pub min_points: usize,
    /// Decimal places used when checking for a degenerate (flat) series.
    pub round_decimals: u32,
    /// A series is degenerate when one rounded value occurs more than
    /// `n * degenerate_fraction` times.
    pub degenerate_fraction: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            min_points: 4,
            round_decimals: 4,
            degenerate_fraction: 0.5,
        }
    }
}

impl FitConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.min_points < 4 {
            return Err(AppError::new(
                EXIT_IO,
                format!("min_points must be >= 4 to constrain a cubic (got {}).", self.min_points),
            ));
        }
        if self.round_decimals > 12 {
            return Err(AppError::new(
                EXIT_IO,
                format!("round_decimals must be <= 12 (got {}).", self.round_decimals),
            ));
        }
        if !(self.degenerate_fraction.is_finite()
            && self.degenerate_fraction > 0.0
            && self.degenerate_fraction <= 1.0)
        {
            return Err(AppError::new(
                EXIT_IO,
                format!(
                    "degenerate_fraction must be in (0, 1] (got {}).",
                    self.degenerate_fraction
                ),
            ));
        }
        Ok(())
    }
}

/// A full `eqs fit` run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus environment and defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub inputs: Vec<PathBuf>,
    pub out_dir: PathBuf,
    pub fit: FitConfig,
    pub export_json: bool,
    pub export_csv: bool,
    pub print_summary: bool,
}

/// A saved fit report (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitReportFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub source: PathBuf,
    pub config: FitConfig,
    pub rows: Vec<URow>,
}
