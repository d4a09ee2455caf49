//! Sine-Gordon kink evaluation and derivatives.
//!
//! The model is `f(x) = s * atan(exp(m*x + d))`: a smooth step from 0 to
//! `s * pi/2` centered at `x = -d/m`, the stationary kink solution of the
//! sine-Gordon equation projected onto one lattice axis.
//!
//! Numerical notes:
//! - `exp(t)` overflows for `t > ~709`, but `atan(inf) = pi/2` is exact in
//!   IEEE arithmetic, so `predict` needs no guard.
//! - The derivative factor `e / (1 + e^2)` does NOT survive overflow
//!   (`inf/inf = NaN`). We use the identity `e/(1+e^2) = 1/(2*cosh(t))`,
//!   which decays to 0 cleanly on both tails.

use crate::domain::SgParams;

/// Evaluate `f(x) = s * atan(exp(m*x + d))`.
pub fn predict(params: &SgParams, x: f64) -> f64 {
    params.s * (params.m * x + params.d).exp().atan()
}

/// Fill a Jacobian row `[df/ds, df/dm, df/dd]` at site `x`.
///
/// With `t = m*x + d` and `e = exp(t)`:
///
/// - `df/ds = atan(e)`
/// - `df/dm = s * x * e / (1 + e^2) = s * x / (2*cosh(t))`
/// - `df/dd = s * e / (1 + e^2)     = s / (2*cosh(t))`
pub fn jacobian_row(params: &SgParams, x: f64, out: &mut [f64]) {
    let t = params.m * x + params.d;
    let sech_half = 0.5 / t.cosh();

    out[0] = t.exp().atan();
    out[1] = params.s * x * sech_half;
    out[2] = params.s * sech_half;
}
