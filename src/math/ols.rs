//! Ordinary least squares solver.
//!
//! Every fit in this project is a tiny dense problem (a handful of scales by
//! four polynomial terms), so we favor robustness over speed:
//!
//! - columns are scaled to unit norm before the decomposition, which keeps a
//!   Vandermonde matrix built from scales near 1.0 well conditioned
//! - the problem is solved through SVD (`QR::solve` only handles square systems)
//! - a design whose numerical rank is below its column count is reported as an
//!   error instead of silently returning a minimum-norm solution

use nalgebra::{DMatrix, DVector};

/// Upper bound on SVD sweeps before we give up on convergence.
const MAX_SVD_ITERS: usize = 10_000;

/// Solve `min ||x β - y||²` using SVD.
///
/// Singular values at or below `rows * ε * σ_max` count as zero. The error
/// string is meant to be shown to the user as-is.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, String> {
    let (rows, cols) = x.shape();
    if rows != y.len() {
        return Err(format!("dimension mismatch: {rows} design rows for {} observations", y.len()));
    }
    if rows < cols {
        return Err(format!("underdetermined system: {rows} equations for {cols} unknowns"));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err("non-finite value in least-squares input".to_string());
    }

    let mut scaled = x.clone();
    let mut norms = Vec::with_capacity(cols);
    for j in 0..cols {
        let norm = scaled.column(j).norm();
        let norm = if norm > 0.0 && norm.is_finite() { norm } else { 1.0 };
        scaled.column_mut(j).scale_mut(1.0 / norm);
        norms.push(norm);
    }

    let svd = scaled
        .try_svd(true, true, f64::EPSILON, MAX_SVD_ITERS)
        .ok_or_else(|| "SVD did not converge".to_string())?;

    let sigma_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    if !(sigma_max.is_finite() && sigma_max > 0.0) {
        return Err("design matrix has no usable singular values".to_string());
    }
    let cutoff = rows as f64 * f64::EPSILON * sigma_max;
    let rank = svd.singular_values.iter().filter(|&&s| s > cutoff).count();
    if rank < cols {
        return Err(format!("rank-deficient design matrix (rank {rank} of {cols})"));
    }

    let mut beta = svd.solve(y, cutoff).map_err(|e| e.to_string())?;
    for (b, norm) in beta.iter_mut().zip(norms) {
        *b /= norm;
    }

    if beta.iter().all(|v| v.is_finite()) {
        Ok(beta)
    } else {
        Err("least-squares solution is not finite".to_string())
    }
}
