//! Mathematical utilities: least-squares solves for the LM step.

pub mod ols;

pub use ols::*;
