//! Dense polynomial helpers.
//!
//! Coefficients are stored highest degree first, so `[a, b, c]` is
//! `a*x^2 + b*x + c`.

use nalgebra::{Complex, DMatrix};

/// Evaluate a polynomial with Horner's rule.
pub fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Coefficients of the first derivative. A constant differentiates to `[]`.
pub fn polyder(coeffs: &[f64]) -> Vec<f64> {
    let degree = coeffs.len().saturating_sub(1);
    coeffs[..degree]
        .iter()
        .enumerate()
        .map(|(i, &c)| c * (degree - i) as f64)
        .collect()
}

/// All complex roots of a polynomial.
///
/// Leading zero coefficients are dropped first, so a "quadratic" with `a = 0`
/// is solved as the linear equation it really is; trailing zeros become roots
/// at the origin. Degree 1 and 2 use closed forms; higher degrees fall back to
/// the eigenvalues of the companion matrix.
pub fn poly_roots(coeffs: &[f64]) -> Vec<Complex<f64>> {
    let Some(first) = coeffs.iter().position(|&c| c != 0.0) else {
        return Vec::new();
    };
    let Some(last) = coeffs.iter().rposition(|&c| c != 0.0) else {
        return Vec::new();
    };

    let trimmed = &coeffs[first..=last];
    let zero_roots = coeffs.len() - 1 - last;

    let mut roots = match trimmed.len() {
        0 | 1 => Vec::new(),
        2 => vec![Complex::new(-trimmed[1] / trimmed[0], 0.0)],
        3 => quadratic_roots(trimmed[0], trimmed[1], trimmed[2]),
        _ => companion_roots(trimmed),
    };
    roots.extend(std::iter::repeat_n(Complex::new(0.0, 0.0), zero_roots));
    roots
}

/// Real roots of a polynomial, ascending.
///
/// A root is real when its imaginary part is exactly zero; the closed-form
/// quadratic only produces a non-zero imaginary part for a negative
/// discriminant, so no tolerance is needed there.
pub fn real_roots(coeffs: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = poly_roots(coeffs)
        .into_iter()
        .filter(|z| z.im == 0.0 && z.re.is_finite())
        .map(|z| z.re)
        .collect();
    out.sort_by(f64::total_cmp);
    out
}

fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<Complex<f64>> {
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        let re = -b / (2.0 * a);
        let im = (-disc).sqrt() / (2.0 * a);
        return vec![Complex::new(re, im), Complex::new(re, -im)];
    }

    // Citardauq form: avoids cancellation when b^2 >> 4ac.
    let q = -0.5 * (b + b.signum() * disc.sqrt());
    if q == 0.0 {
        return vec![Complex::new(0.0, 0.0); 2];
    }
    vec![Complex::new(q / a, 0.0), Complex::new(c / q, 0.0)]
}

fn companion_roots(coeffs: &[f64]) -> Vec<Complex<f64>> {
    let n = coeffs.len() - 1;
    let mut companion = DMatrix::<f64>::zeros(n, n);
    for j in 0..n {
        companion[(0, j)] = -coeffs[j + 1] / coeffs[0];
    }
    for i in 1..n {
        companion[(i, i - 1)] = 1.0;
    }
    companion.complex_eigenvalues().iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn polyval_matches_expanded_form() {
        let c = [2.0, -3.0, 0.5, 7.0];
        let x = 1.3_f64;
        let expected = 2.0 * x.powi(3) - 3.0 * x * x + 0.5 * x + 7.0;
        assert_relative_eq!(polyval(&c, x), expected, epsilon = 1e-12);
    }

    #[test]
    fn polyder_of_cubic() {
        assert_eq!(polyder(&[1.0, 2.0, 3.0, 4.0]), vec![3.0, 4.0, 3.0]);
        assert!(polyder(&[5.0]).is_empty());
    }

    #[test]
    fn quadratic_with_two_real_roots() {
        // (x - 1)(x - 2)
        let r = real_roots(&[1.0, -3.0, 2.0]);
        assert_eq!(r.len(), 2);
        assert_relative_eq!(r[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(r[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn complex_pair_has_no_real_roots() {
        // x^2 + 1
        let all = poly_roots(&[1.0, 0.0, 1.0]);
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|z| z.im != 0.0));
        assert!(real_roots(&[1.0, 0.0, 1.0]).is_empty());
    }

    #[test]
    fn leading_zero_degrades_to_linear() {
        // 0*x^2 + 2x - 4
        assert_eq!(real_roots(&[0.0, 2.0, -4.0]), vec![2.0]);
    }

    #[test]
    fn constant_and_zero_polynomials_have_no_roots() {
        assert!(poly_roots(&[0.0, 0.0, 5.0]).is_empty());
        assert!(poly_roots(&[0.0, 0.0, 0.0]).is_empty());
    }

    #[test]
    fn trailing_zero_adds_root_at_origin() {
        // x^2 - x = x (x - 1)
        assert_eq!(real_roots(&[1.0, -1.0, 0.0]), vec![0.0, 1.0]);
    }

    #[test]
    fn cubic_uses_companion_matrix() {
        // (x - 1)(x - 2)(x - 3)
        let mut r = poly_roots(&[1.0, -6.0, 11.0, -6.0]);
        assert_eq!(r.len(), 3);
        r.sort_by(|a, b| a.re.total_cmp(&b.re));
        for (got, want) in r.iter().zip([1.0, 2.0, 3.0]) {
            assert_relative_eq!(got.re, want, epsilon = 1e-9);
            assert!(got.im.abs() < 1e-9);
        }
    }
}
