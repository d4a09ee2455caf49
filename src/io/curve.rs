//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a fitted run:
//! - sine-Gordon parameters and fit quality per dataset
//! - axis labels and the run title
//! - a precomputed fitted grid for quick re-plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use crate::app::pipeline::RunOutput;
use crate::domain::{CurveEntry, CurveFile, CurveGrid, RunConfig};
use crate::error::AppError;
use crate::models::predict;

/// Grid density of the saved fitted curve.
const GRID_POINTS: usize = 101;

/// Write a curve JSON file for a whole run.
pub fn write_curve_json(path: &Path, run: &RunOutput, config: &RunConfig) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display()))
    })?;

    let curves = run
        .datasets
        .iter()
        .map(|ds| {
            let x_max = ds.sites.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 1.0;
            let (sites, y) = build_grid(ds, x_max);
            CurveEntry {
                label: ds.spec.label.clone(),
                params: ds.fit.params,
                quality: ds.fit.quality.clone(),
                grid: CurveGrid { sites, y },
            }
        })
        .collect();

    let curve_file = CurveFile {
        tool: "kink".to_string(),
        title: config.title.clone(),
        x_label: config.x_label.clone(),
        y_label: config.y_label.clone(),
        curves,
    };

    serde_json::to_writer_pretty(file, &curve_file)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display()))
    })?;
    let curve: CurveFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

fn build_grid(ds: &crate::app::pipeline::DatasetRun, x_max: f64) -> (Vec<f64>, Vec<f64>) {
    let mut x1 = x_max;
    if !x1.is_finite() || x1 <= 0.0 {
        x1 = ds.mean.len() as f64;
    }

    let mut sites = Vec::with_capacity(GRID_POINTS);
    let mut y = Vec::with_capacity(GRID_POINTS);
    for i in 0..GRID_POINTS {
        let u = i as f64 / (GRID_POINTS as f64 - 1.0);
        let x = u * x1;
        sites.push(x);
        y.push(predict(&ds.fit.params, x) * ds.spec.plot_scale);
    }
    (sites, y)
}
