//! Statistical reduction: raw samples -> mean displacement profiles.
//!
//! Two reducers cover the two on-disk formats:
//!
//! - `mean_best_axes` averages the offset arrays of the most-displaced axes
//!   across every line of a multi-axis offsets file
//! - `mean_rows` averages a rectangular table across its row (trial)
//!   dimension, with an optional rescale
//!
//! Both validate shape uniformity up front and fail the run on mismatch
//! rather than silently producing a wrong profile.

use crate::domain::Axis;
use crate::error::AppError;

/// Mean profiles of the `best_n` most-displaced axes across all lines.
///
/// The simulation sorts each line's axes ascending by total |offset| before
/// writing, so "best" axes sit at the end. Output is ordered best-first:
/// `profiles[0]` averages the last axis of every line, `profiles[1]` the
/// second-to-last, and so on.
pub fn mean_best_axes(lines: &[Vec<Axis>], best_n: usize) -> Result<Vec<Vec<f64>>, AppError> {
    if lines.is_empty() {
        return Err(AppError::new(3, "Offsets file contains no sample lines."));
    }
    if best_n == 0 {
        return Err(AppError::new(3, "best_n must be >= 1."));
    }

    let n_sites = lines[0]
        .last()
        .map(Axis::len)
        .ok_or_else(|| AppError::new(3, "First sample line has no axes."))?;

    let mut sums = vec![vec![0.0f64; n_sites]; best_n];

    for (line_no, axes) in lines.iter().enumerate() {
        if axes.len() < best_n {
            return Err(AppError::new(
                3,
                format!(
                    "Line {}: found {} axes, need at least {best_n}.",
                    line_no + 1,
                    axes.len()
                ),
            ));
        }
        for rank in 0..best_n {
            let axis = &axes[axes.len() - 1 - rank];
            if axis.len() != n_sites {
                return Err(AppError::new(
                    3,
                    format!(
                        "Line {}: axis '{}' has {} offsets, expected {n_sites}.",
                        line_no + 1,
                        axis.label,
                        axis.len()
                    ),
                ));
            }
            for (acc, &v) in sums[rank].iter_mut().zip(axis.offset.iter()) {
                *acc += v;
            }
        }
    }

    let n = lines.len() as f64;
    for profile in &mut sums {
        for v in profile.iter_mut() {
            *v /= n;
        }
    }
    Ok(sums)
}

/// Mean of a rectangular table across rows, divided by `scale`.
///
/// `scale` is typically the number of projections summed into each raw
/// column (3 for the hexagonal datasets); pass 1.0 for none.
pub fn mean_rows(table: &[Vec<f64>], scale: f64) -> Result<Vec<f64>, AppError> {
    if table.is_empty() {
        return Err(AppError::new(3, "Table contains no rows."));
    }
    if !(scale.is_finite() && scale != 0.0) {
        return Err(AppError::new(3, format!("Invalid scale {scale} (must be finite and nonzero).")));
    }

    let n_sites = table[0].len();
    if n_sites == 0 {
        return Err(AppError::new(3, "Table rows are empty."));
    }

    let mut mean = vec![0.0f64; n_sites];
    for (i, row) in table.iter().enumerate() {
        if row.len() != n_sites {
            return Err(AppError::new(
                3,
                format!("Row {}: {} columns, expected {n_sites}.", i + 1, row.len()),
            ));
        }
        for (acc, &v) in mean.iter_mut().zip(row.iter()) {
            *acc += v;
        }
    }

    let denom = table.len() as f64 * scale;
    for v in &mut mean {
        *v /= denom;
    }
    Ok(mean)
}
