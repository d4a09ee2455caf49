//! Nonlinear curve fitting.
//!
//! Responsibilities:
//!
//! - Levenberg-Marquardt minimization of the sine-Gordon residuals
//! - covariance estimation at the solution

pub mod fitter;

pub use fitter::*;
