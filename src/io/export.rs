//! Export per-site results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per (dataset, site) with mean, fitted value, and residual.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::app::pipeline::RunOutput;
use crate::error::AppError;
use crate::report::compute_residuals;

/// Write per-site results for a whole run to a CSV file.
pub fn write_results_csv(path: &Path, run: &RunOutput) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "dataset,site,mean,fit,residual")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for ds in &run.datasets {
        for r in compute_residuals(ds)? {
            writeln!(
                file,
                "{},{:.1},{:.10},{:.10},{:.10}",
                ds.spec.label, r.site, r.mean, r.y_fit, r.residual
            )
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
        }
    }

    Ok(())
}
