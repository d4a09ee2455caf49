//! Data generation helpers (synthetic demo inputs).

pub mod synth;

pub use synth::*;
