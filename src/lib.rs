//! `kink-curves` library crate.
//!
//! The binary (`kink`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., batch analysis, future GUI)
//! - code stays easy to navigate as the project grows
//!
//! The tool loads atomic displacement profiles written by lattice vacancy
//! simulations (BCC, SC, hexagonal), averages them into one mean profile per
//! dataset, fits the sine-Gordon kink `S * atan(exp(M*x + D))` by
//! Levenberg-Marquardt, and renders the profile points together with the
//! fitted curve.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod presets;
pub mod profile;
pub mod reduce;
pub mod report;
pub mod tui;
