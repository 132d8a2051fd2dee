//! Cubic energy-vs-scale model.
//!
//! The fitter relies on three primitive operations:
//! - build a design row for a given scale (for OLS)
//! - predict `E(s)` given coefficients (for minimum selection and plots)
//! - differentiate the curve (for critical points)

use crate::math::{polyder, polyval};

/// Number of coefficients of the cubic (`c0..c3`).
pub const CUBIC_TERMS: usize = 4;

/// Fill a Vandermonde row `[s^3, s^2, s, 1]`.
///
/// # Panics
/// Panics if `out` is shorter than `CUBIC_TERMS`.
pub fn fill_design_row(scale: f64, out: &mut [f64]) {
    out[3] = 1.0;
    out[2] = scale;
    out[1] = scale * scale;
    out[0] = out[1] * scale;
}

/// Predict `E(s)` for the given coefficients (highest degree first).
pub fn predict(coefficients: &[f64; CUBIC_TERMS], scale: f64) -> f64 {
    polyval(coefficients, scale)
}

/// Coefficients of `dE/ds`, a quadratic.
pub fn derivative(coefficients: &[f64; CUBIC_TERMS]) -> Vec<f64> {
    polyder(coefficients)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_row_is_descending_powers() {
        let mut row = [0.0; CUBIC_TERMS];
        fill_design_row(2.0, &mut row);
        assert_eq!(row, [8.0, 4.0, 2.0, 1.0]);
    }

    #[test]
    fn predict_agrees_with_design_row() {
        let c = [1.5, -2.0, 0.25, 3.0];
        let mut row = [0.0; CUBIC_TERMS];
        fill_design_row(1.1, &mut row);
        let dot: f64 = row.iter().zip(c.iter()).map(|(r, c)| r * c).sum();
        assert!((predict(&c, 1.1) - dot).abs() < 1e-12);
    }

    #[test]
    fn derivative_of_cubic_is_quadratic() {
        assert_eq!(derivative(&[1.0, 1.0, 1.0, 1.0]), vec![3.0, 2.0, 1.0]);
    }
}
