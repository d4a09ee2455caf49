//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - parsed input records (`Axis`)
//! - dataset/source descriptions (`DatasetSpec`, `SourceSpec`, `Transform`)
//! - fit outputs (`SgParams`, `SgFit`, `FitQuality`)
//! - the saved-curve JSON schema (`CurveFile`)

pub mod types;

pub use types::*;
