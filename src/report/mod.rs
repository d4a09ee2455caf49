//! Reporting utilities: per-site residuals and formatted terminal output.

pub mod format;

pub use format::*;

use crate::app::pipeline::DatasetRun;
use crate::error::AppError;
use crate::models::predict;

/// Fitted value and residual at one lattice site.
#[derive(Debug, Clone)]
pub struct SiteResidual {
    pub site: f64,
    pub mean: f64,
    pub y_fit: f64,
    pub residual: f64,
}

/// Compute fitted values and residuals for each site of a dataset.
///
/// Residuals are taken on the fit input (the unscaled mean profile), not on
/// the display-scaled series.
pub fn compute_residuals(run: &DatasetRun) -> Result<Vec<SiteResidual>, AppError> {
    let mut out = Vec::with_capacity(run.sites.len());
    for (&site, &mean) in run.sites.iter().zip(run.mean.iter()) {
        let y_fit = predict(&run.fit.params, site);
        if !y_fit.is_finite() {
            return Err(AppError::new(
                4,
                "Non-finite model prediction during residual computation.",
            ));
        }
        out.push(SiteResidual {
            site,
            mean,
            y_fit,
            residual: mean - y_fit,
        });
    }
    Ok(out)
}
