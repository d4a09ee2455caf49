//! Closed-form models: the sine-Gordon kink and the star-polymer potential.
//!
//! The fitter relies on two primitive operations:
//! - evaluate `f(x)` given parameters (for residuals/plots)
//! - fill a Jacobian row for a given site (for the LM step)
//!
//! Both are implemented here.

pub mod model;
pub mod star;

pub use model::*;
pub use star::*;
