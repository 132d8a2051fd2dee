//! Per-cell fitting routines.
//!
//! Given the samples of one U value and a property column we:
//! - keep the `(scale, value)` pairs with a present, finite value
//! - reject series that are too short or too flat to trust a cubic
//! - solve an OLS problem for the four cubic coefficients
//! - hand the curve to [`crate::fit::locate`] to find the equilibrium
//!
//! Every cell is independent, so [`fit_groups`] evaluates them in parallel and
//! reassembles the results in ascending-U, fixed-column order.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use tracing::debug;

use crate::domain::{
    Column, CubicFit, FitConfig, FitResult, FitStatus, PROPERTY_COLUMNS, Sample, ScanGroups, URow,
};
use crate::fit::locate::{critical_points, select_minimum};
use crate::math::solve_least_squares;
use crate::models::{CUBIC_TERMS, fill_design_row};

/// Fit every (U, column) cell of the grouped scan.
pub fn fit_groups(groups: &ScanGroups, config: &FitConfig) -> Vec<URow> {
    let cells: Vec<(f64, Column, &[Sample])> = groups
        .iter()
        .flat_map(|(u, samples)| Column::ALL.into_iter().map(move |column| (u, column, samples)))
        .collect();

    // Indexed parallel collect keeps the input order.
    let results: Vec<FitResult> = cells
        .par_iter()
        .map(|&(u, column, samples)| fit_cell(u, column, samples, config))
        .collect();

    results
        .chunks_exact(PROPERTY_COLUMNS)
        .map(|chunk| URow {
            u: chunk[0].u,
            cells: chunk.to_vec(),
        })
        .collect()
}

/// Fit one property column of one U group.
pub fn fit_cell(u: f64, column: Column, samples: &[Sample], config: &FitConfig) -> FitResult {
    let (scales, values) = valid_pairs(samples, column.index());
    let result = fit_series(u, column, &scales, &values, config);
    debug!(
        u,
        column = column.label(),
        n_valid = result.n_valid,
        status = result.status.label(),
        "fitted cell"
    );
    result
}

/// Split samples into parallel `scales` / `values` vectors, dropping absent
/// and non-finite entries.
pub fn valid_pairs(samples: &[Sample], idx: usize) -> (Vec<f64>, Vec<f64>) {
    samples
        .iter()
        .filter_map(|s| {
            let v = s.property(idx)?;
            (v.is_finite() && s.scale.is_finite()).then_some((s.scale, v))
        })
        .unzip()
}

/// Gate, fit and locate the equilibrium of a single `(scale, value)` series.
///
/// This is a pure function of its inputs.
pub fn fit_series(
    u: f64,
    column: Column,
    scales: &[f64],
    values: &[f64],
    config: &FitConfig,
) -> FitResult {
    let n = scales.len().min(values.len());
    let (scales, values) = (&scales[..n], &values[..n]);

    if n < config.min_points {
        return FitResult::rejected(u, column, n, FitStatus::InsufficientData);
    }
    if is_degenerate(values, config.round_decimals, config.degenerate_fraction) {
        return FitResult::rejected(u, column, n, FitStatus::DegenerateData);
    }

    let coefficients = match fit_cubic(scales, values) {
        Ok(c) => c,
        Err(message) => return FitResult::rejected(u, column, n, FitStatus::FitFailed(message)),
    };

    let domain = scale_domain(scales);
    let critical_points = critical_points(&coefficients);
    let equilibrium = select_minimum(&coefficients, &critical_points, domain);
    let status = if equilibrium.is_some() {
        FitStatus::Ok
    } else {
        FitStatus::NoMinimumFound
    };

    FitResult {
        u,
        column,
        n_valid: n,
        fit: Some(CubicFit {
            coefficients,
            domain,
            critical_points,
        }),
        equilibrium,
        status,
    }
}

/// Least-squares cubic through the points, highest degree first.
pub fn fit_cubic(scales: &[f64], values: &[f64]) -> Result<[f64; CUBIC_TERMS], String> {
    let distinct = distinct_count(scales);
    if distinct < CUBIC_TERMS {
        return Err(format!(
            "rank-deficient design matrix: {distinct} distinct scales for {CUBIC_TERMS} coefficients"
        ));
    }

    let n = scales.len();
    let mut x = DMatrix::<f64>::zeros(n, CUBIC_TERMS);
    let mut row = [0.0; CUBIC_TERMS];
    for (i, &s) in scales.iter().enumerate() {
        fill_design_row(s, &mut row);
        for (j, &v) in row.iter().enumerate() {
            x[(i, j)] = v;
        }
    }
    let y = DVector::from_column_slice(values);

    let beta = solve_least_squares(&x, &y)?;
    Ok([beta[0], beta[1], beta[2], beta[3]])
}

/// True when the most common value, after rounding to `decimals` places,
/// accounts for more than `fraction` of the series.
pub fn is_degenerate(values: &[f64], decimals: u32, fraction: f64) -> bool {
    if values.is_empty() {
        return false;
    }

    let mut rounded: Vec<f64> = values.iter().map(|&v| round_to(v, decimals)).collect();
    rounded.sort_by(f64::total_cmp);

    let mut longest = 0usize;
    let mut run = 0usize;
    let mut prev: Option<f64> = None;
    for v in rounded {
        run = if prev == Some(v) { run + 1 } else { 1 };
        prev = Some(v);
        longest = longest.max(run);
    }

    longest as f64 > values.len() as f64 * fraction
}

/// Round half-to-even at `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    // `+ 0.0` folds -0.0 into 0.0 so both count as the same value.
    (value * factor).round_ties_even() / factor + 0.0
}

fn distinct_count(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup_by(|a, b| a == b);
    sorted.len()
}

fn scale_domain(scales: &[f64]) -> (f64, f64) {
    scales
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| (lo.min(s), hi.max(s)))
}
