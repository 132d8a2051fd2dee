//! Equilibrium location on a fitted cubic.
//!
//! Rules:
//! 1. Critical points are the real roots of `dE/ds`.
//! 2. Only critical points inside the observed scale range are candidates;
//!    the cubic's tails outside the sampled data are never trusted.
//! 3. The candidate with the lowest fitted energy wins (strict `<`, so the
//!    first of equal candidates is kept).

use crate::domain::Equilibrium;
use crate::math::real_roots;
use crate::models::{CUBIC_TERMS, derivative, predict};

/// Real roots of the derivative, ascending. No domain restriction.
pub fn critical_points(coefficients: &[f64; CUBIC_TERMS]) -> Vec<f64> {
    real_roots(&derivative(coefficients))
}

/// Pick the lowest-energy candidate inside the closed `domain`.
pub fn select_minimum(
    coefficients: &[f64; CUBIC_TERMS],
    candidates: &[f64],
    domain: (f64, f64),
) -> Option<Equilibrium> {
    let (lo, hi) = domain;
    let mut best: Option<Equilibrium> = None;
    for &scale in candidates {
        if !(lo <= scale && scale <= hi) {
            continue;
        }
        let value = predict(coefficients, scale);
        if best.is_none_or(|b| value < b.value) {
            best = Some(Equilibrium { scale, value });
        }
    }
    best
}
