//! Levenberg-Marquardt fitting of the sine-Gordon kink.
//!
//! Given sites `x_i` and a mean profile `y_i`, we minimize
//!
//! ```text
//! SSE(s, m, d) = sum_i (y_i - s * atan(exp(m*x_i + d)))^2
//! ```
//!
//! by damped Gauss-Newton steps: solve
//! `(J^T J + lambda * diag(J^T J)) delta = J^T r`, accept the step when it
//! lowers the SSE (shrinking `lambda`), otherwise raise `lambda` and retry.
//! This is deterministic: fixed initial guess, fixed damping schedule, fixed
//! iteration budget, no randomness.

use nalgebra::{DMatrix, DVector};

use crate::domain::{FitQuality, SgFit, SgParams};
use crate::error::AppError;
use crate::math::{pseudo_inverse, solve_least_squares};
use crate::models::{jacobian_row, predict};

/// Initial guess used by every fit in this tool.
pub const DEFAULT_GUESS: SgParams = SgParams { s: 0.5, m: 1.0, d: -10.0 };

/// Iteration budget. Exceeding it is a fatal error; there is no retry or
/// alternate seeding.
pub const MAX_ITERATIONS: usize = 200;

const LAMBDA_INIT: f64 = 1e-3;
const LAMBDA_MAX: f64 = 1e12;
const STEP_TOL: f64 = 1e-10;
const SSE_REL_TOL: f64 = 1e-12;

/// Fit the sine-Gordon kink to `(sites, profile)` from the default guess.
pub fn fit_sine_gordon(sites: &[f64], profile: &[f64]) -> Result<SgFit, AppError> {
    fit_sine_gordon_from(sites, profile, DEFAULT_GUESS)
}

/// Fit the sine-Gordon kink starting from an explicit guess.
pub fn fit_sine_gordon_from(
    sites: &[f64],
    profile: &[f64],
    guess: SgParams,
) -> Result<SgFit, AppError> {
    fit_with_budget(sites, profile, guess, MAX_ITERATIONS)
}

fn fit_with_budget(
    sites: &[f64],
    profile: &[f64],
    guess: SgParams,
    max_iterations: usize,
) -> Result<SgFit, AppError> {
    let n = sites.len();
    if n != profile.len() {
        return Err(AppError::new(
            3,
            format!("Fit input mismatch: {n} sites vs {} profile values.", profile.len()),
        ));
    }
    if n < 4 {
        return Err(AppError::new(
            3,
            format!("Need at least 4 points to fit 3 parameters (got {n})."),
        ));
    }
    if sites.iter().chain(profile.iter()).any(|v| !v.is_finite()) {
        return Err(AppError::new(3, "Non-finite value in fit input."));
    }

    let mut params = guess;
    let mut lambda = LAMBDA_INIT;
    let mut sse = sse_at(sites, profile, &params);
    let mut converged = false;
    let mut iterations = 0;

    for iter in 1..=max_iterations {
        iterations = iter;

        let (jac, residuals) = build_system(sites, profile, &params);
        let jtj = jac.transpose() * &jac;
        let jtr = jac.transpose() * &residuals;

        // Damped normal equations: scale the diagonal rather than adding a
        // plain multiple of the identity so the damping is parameter-scale
        // aware (Marquardt's variant).
        let mut damped = jtj.clone();
        for k in 0..3 {
            damped[(k, k)] *= 1.0 + lambda;
        }

        let Some(delta) = solve_least_squares(&damped, &jtr) else {
            // Singular even under damping: raise lambda and try again.
            lambda *= 2.0;
            if lambda > LAMBDA_MAX {
                break;
            }
            continue;
        };

        let candidate = SgParams {
            s: params.s + delta[0],
            m: params.m + delta[1],
            d: params.d + delta[2],
        };
        let sse_new = sse_at(sites, profile, &candidate);

        if sse_new.is_finite() && sse_new <= sse {
            let step = delta.amax();
            let improved = sse - sse_new;
            params = candidate;
            sse = sse_new;
            lambda = (lambda * 0.5).max(1e-15);

            if step < STEP_TOL || improved <= SSE_REL_TOL * sse.max(1e-30) {
                converged = true;
                break;
            }
        } else {
            lambda *= 2.0;
            if lambda > LAMBDA_MAX {
                // The step size the damping allows is numerically zero; treat
                // a stationary point with finite SSE as converged.
                converged = sse.is_finite();
                break;
            }
        }
    }

    if !converged {
        return Err(AppError::new(
            4,
            format!("Sine-Gordon fit did not converge within {max_iterations} iterations."),
        ));
    }

    let covariance = covariance_at(sites, profile, &params, sse);
    let quality = FitQuality {
        sse,
        rmse: (sse / n as f64).sqrt(),
        n,
        iterations,
    };

    Ok(SgFit {
        params,
        covariance,
        quality,
    })
}

fn sse_at(sites: &[f64], profile: &[f64], params: &SgParams) -> f64 {
    sites
        .iter()
        .zip(profile.iter())
        .map(|(&x, &y)| {
            let r = y - predict(params, x);
            r * r
        })
        .sum()
}

fn build_system(sites: &[f64], profile: &[f64], params: &SgParams) -> (DMatrix<f64>, DVector<f64>) {
    let n = sites.len();
    let mut jac = DMatrix::<f64>::zeros(n, 3);
    let mut residuals = DVector::<f64>::zeros(n);
    let mut row = [0.0; 3];

    for i in 0..n {
        jacobian_row(params, sites[i], &mut row);
        jac[(i, 0)] = row[0];
        jac[(i, 1)] = row[1];
        jac[(i, 2)] = row[2];
        residuals[i] = profile[i] - predict(params, sites[i]);
    }

    (jac, residuals)
}

/// Parameter covariance `(J^T J)^-1 * mse` at the solution.
///
/// Falls back to zeros when `J^T J` is rank-deficient; the caller only
/// reports this matrix, so a degenerate fit should not fail the run here.
fn covariance_at(sites: &[f64], profile: &[f64], params: &SgParams, sse: f64) -> [[f64; 3]; 3] {
    let (jac, _) = build_system(sites, profile, params);
    let jtj = jac.transpose() * &jac;
    let n = sites.len();
    let dof = (n as f64 - 3.0).max(1.0);
    let mse = sse / dof;

    let mut out = [[0.0; 3]; 3];
    if let Some(inv) = pseudo_inverse(&jtj) {
        for i in 0..3 {
            for j in 0..3 {
                out[i][j] = inv[(i, j)] * mse;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic(params: &SgParams, n: usize) -> (Vec<f64>, Vec<f64>) {
        let sites: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let profile: Vec<f64> = sites.iter().map(|&x| predict(params, x)).collect();
        (sites, profile)
    }

    #[test]
    fn recovers_parameters_from_exact_kink() {
        let truth = SgParams { s: 0.5, m: 0.9, d: -8.0 };
        let (sites, profile) = synthetic(&truth, 20);

        let fit = fit_sine_gordon(&sites, &profile).unwrap();
        assert!((fit.params.s - truth.s).abs() < 1e-4, "s = {}", fit.params.s);
        assert!((fit.params.m - truth.m).abs() < 1e-4, "m = {}", fit.params.m);
        assert!((fit.params.d - truth.d).abs() < 1e-3, "d = {}", fit.params.d);
        assert!(fit.quality.rmse < 1e-6);
    }

    #[test]
    fn perfect_guess_converges_immediately() {
        let truth = DEFAULT_GUESS;
        let (sites, profile) = synthetic(&truth, 19);

        let fit = fit_sine_gordon(&sites, &profile).unwrap();
        assert!(fit.quality.sse < 1e-20);
        assert!(fit.quality.iterations <= 2);
    }

    #[test]
    fn tolerates_small_noise() {
        let truth = SgParams { s: 0.5, m: 1.1, d: -9.0 };
        let (sites, mut profile) = synthetic(&truth, 19);
        // Deterministic low-amplitude perturbation.
        for (i, v) in profile.iter_mut().enumerate() {
            *v += 1e-3 * ((i as f64 * 0.7).sin());
        }

        let fit = fit_sine_gordon(&sites, &profile).unwrap();
        assert!((fit.params.s - truth.s).abs() < 0.05);
        assert!((fit.params.m - truth.m).abs() < 0.2);
        assert!(fit.quality.rmse < 5e-3);
    }

    #[test]
    fn covariance_is_symmetric_and_finite() {
        let truth = SgParams { s: 0.5, m: 0.8, d: -7.0 };
        let (sites, mut profile) = synthetic(&truth, 19);
        for (i, v) in profile.iter_mut().enumerate() {
            *v += 1e-3 * ((i as f64 * 1.3).cos());
        }

        let fit = fit_sine_gordon(&sites, &profile).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert!(fit.covariance[i][j].is_finite());
                assert!((fit.covariance[i][j] - fit.covariance[j][i]).abs() < 1e-8);
            }
        }
    }

    #[test]
    fn exhausted_iteration_budget_is_a_numeric_error() {
        // Far-off guess with a budget too small to reach the tolerances.
        let truth = SgParams { s: 0.5, m: 0.9, d: -8.0 };
        let (sites, profile) = synthetic(&truth, 20);

        let err = fit_with_budget(&sites, &profile, DEFAULT_GUESS, 1).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("1 iterations"), "{err}");

        // A zero budget never converges either.
        let err = fit_with_budget(&sites, &profile, DEFAULT_GUESS, 0).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = fit_sine_gordon(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 2.0]).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn rejects_too_few_points() {
        let err = fit_sine_gordon(&[0.0, 1.0, 2.0], &[0.0, 0.5, 1.0]).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn rejects_non_finite_input() {
        let err = fit_sine_gordon(&[0.0, 1.0, 2.0, 3.0], &[0.0, f64::NAN, 1.0, 1.0]).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
