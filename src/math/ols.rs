//! Least squares solver.
//!
//! The Levenberg-Marquardt fitter repeatedly solves small damped systems of
//! the form:
//!
//! ```text
//! (J^T J + lambda * diag(J^T J)) delta = J^T r
//! ```
//!
//! Implementation choices:
//! - We use SVD to solve robustly even when the system is near-singular
//!   (a nearly flat profile makes the Jacobian columns almost collinear).
//!   (Nalgebra's `QR::solve` is intended for square well-conditioned systems
//!   and offers no rank control.)
//! - Because the parameter dimension is tiny (3 columns), SVD performance is
//!   irrelevant here.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Pseudo-inverse via SVD, used for the parameter covariance estimate.
///
/// Returns `None` when the matrix is effectively rank-deficient.
pub fn pseudo_inverse(x: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let svd = x.clone().svd(true, true);
    let inv = svd.pseudo_inverse(1e-10).ok()?;
    if inv.iter().all(|v| v.is_finite()) {
        Some(inv)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn pseudo_inverse_inverts_identity() {
        let x = DMatrix::<f64>::identity(3, 3);
        let inv = pseudo_inverse(&x).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((inv[(i, j)] - expected).abs() < 1e-12);
            }
        }
    }
}
