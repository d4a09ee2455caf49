//! Shared "reduce + fit" pipeline used by every front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> average -> transform -> fit -> sample curve
//!
//! The CLI, the ASCII plot, the TUI, and the exporters all consume the same
//! `RunOutput`; they differ only in presentation.

use rayon::prelude::*;

use crate::domain::{DatasetSpec, DatasetStats, Rgb, RunConfig, SgFit, SourceSpec};
use crate::error::AppError;
use crate::io::{load_axis_lines, load_table};
use crate::models::predict;
use crate::profile;
use crate::reduce::{mean_best_axes, mean_rows};

/// Points along the dense fitted curve.
const CURVE_SAMPLES: usize = 200;

/// One plotted point series (a mean profile after display scaling).
#[derive(Debug, Clone)]
pub struct SeriesRun {
    pub color: Rgb,
    pub values: Vec<f64>,
}

/// All computed outputs for one dataset.
#[derive(Debug, Clone)]
pub struct DatasetRun {
    pub spec: DatasetSpec,
    /// Site index axis (after any suffix shift).
    pub sites: Vec<f64>,
    /// Displayed point series; `series[0]` is the fitted channel.
    pub series: Vec<SeriesRun>,
    /// Fit input: the best mean profile with transforms applied, before
    /// display scaling.
    pub mean: Vec<f64>,
    pub fit: SgFit,
    /// Dense fitted curve over `[0, max_site + 1]`, display-scaled.
    pub curve: Vec<(f64, f64)>,
    pub stats: DatasetStats,
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub datasets: Vec<DatasetRun>,
}

/// Execute the full pipeline for every dataset in the config.
///
/// Datasets are independent, so they are reduced and fitted in parallel.
pub fn run(config: &RunConfig) -> Result<RunOutput, AppError> {
    if config.datasets.is_empty() {
        return Err(AppError::new(3, "Run config contains no datasets."));
    }

    let datasets: Vec<DatasetRun> = config
        .datasets
        .par_iter()
        .map(run_dataset)
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(RunOutput { datasets })
}

fn run_dataset(spec: &DatasetSpec) -> Result<DatasetRun, AppError> {
    // 1) Load + reduce to mean profiles (best channel first).
    let (mut profiles, n_samples) = match &spec.source {
        SourceSpec::AxisFile { path, best_n } => {
            let lines = load_axis_lines(path)?;
            let n = lines.len();
            (mean_best_axes(&lines, *best_n)?, n)
        }
        SourceSpec::Table { path, scale } => {
            let table = load_table(path)?;
            let n = table.len();
            (vec![mean_rows(&table, *scale)?], n)
        }
    };

    // 2) Per-preset transforms, applied to every channel.
    for p in &mut profiles {
        profile::apply(&spec.transforms, p);
    }

    let n_sites = profiles[0].len();
    let mut sites: Vec<f64> = (0..n_sites).map(|i| i as f64).collect();
    if let Some((start, delta)) = spec.site_shift {
        profile::segment_shift(&mut sites, start, delta);
    }

    // 3) Fit the best channel.
    let fit = crate::fit::fit_sine_gordon(&sites, &profiles[0]).map_err(|e| {
        AppError::new(
            e.exit_code(),
            format!("{} ({}): {e}", spec.label, spec.source.path().display()),
        )
    })?;

    // 4) Display series and the dense fitted curve.
    let series: Vec<SeriesRun> = profiles
        .iter()
        .enumerate()
        .map(|(idx, p)| SeriesRun {
            color: spec.series_color(idx),
            values: p.iter().map(|v| v * spec.plot_scale).collect(),
        })
        .collect();

    let x_max = sites.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 1.0;
    let mut curve = Vec::with_capacity(CURVE_SAMPLES);
    for i in 0..CURVE_SAMPLES {
        let u = i as f64 / (CURVE_SAMPLES as f64 - 1.0);
        let x = u * x_max;
        curve.push((x, predict(&fit.params, x) * spec.plot_scale));
    }

    let stats = compute_stats(n_samples, n_sites, &series)
        .ok_or_else(|| AppError::new(3, format!("{}: no finite values after reduction.", spec.label)))?;

    Ok(DatasetRun {
        spec: spec.clone(),
        sites,
        series,
        mean: profiles.swap_remove(0),
        fit,
        curve,
        stats,
    })
}

fn compute_stats(n_samples: usize, n_sites: usize, series: &[SeriesRun]) -> Option<DatasetStats> {
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for s in series {
        for &v in &s.values {
            y_min = y_min.min(v);
            y_max = y_max.max(v);
        }
    }
    if !(y_min.is_finite() && y_max.is_finite()) {
        return None;
    }
    Some(DatasetStats {
        n_samples,
        n_sites,
        y_min,
        y_max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{generate_table, SynthSpec};
    use crate::domain::{LineStyle, SgParams, Transform};
    use crate::io::write_table;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("kink-curves-test-{}-{name}", std::process::id()));
        p
    }

    #[test]
    fn pipeline_runs_on_synthetic_table() {
        let truth = SgParams { s: 0.5, m: 1.0, d: -9.0 };
        let table = generate_table(&SynthSpec {
            rows: 100,
            sites: 19,
            params: truth,
            noise_sigma: 0.01,
            seed: 3,
            scale: 3.0,
        })
        .unwrap();

        let path = temp_path("pipeline.dat");
        write_table(&path, &table).unwrap();

        let spec = DatasetSpec {
            label: "synthetic".to_string(),
            source: SourceSpec::Table { path: path.clone(), scale: 3.0 },
            transforms: vec![],
            site_shift: None,
            plot_scale: 1.0,
            colors: vec![Rgb::BLACK],
            curve_color: None,
            line_style: LineStyle::Solid,
        };

        let run = run_dataset(&spec).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(run.stats.n_samples, 100);
        assert_eq!(run.stats.n_sites, 19);
        assert_eq!(run.series.len(), 1);
        assert_eq!(run.curve.len(), CURVE_SAMPLES);
        assert!((run.fit.params.s - truth.s).abs() < 0.05);
    }

    #[test]
    fn site_shift_moves_suffix_of_index_axis() {
        let truth = SgParams { s: 0.5, m: 1.0, d: -5.0 };
        let table = generate_table(&SynthSpec {
            rows: 10,
            sites: 10,
            params: truth,
            noise_sigma: 0.0,
            seed: 1,
            scale: 1.0,
        })
        .unwrap();

        let path = temp_path("siteshift.dat");
        write_table(&path, &table).unwrap();

        let spec = DatasetSpec {
            label: "shifted".to_string(),
            source: SourceSpec::Table { path: path.clone(), scale: 1.0 },
            transforms: vec![Transform::SegmentShift { start: 5, delta: 0.0 }],
            site_shift: Some((5, 1.0)),
            plot_scale: 1.0,
            colors: vec![Rgb::BLACK],
            curve_color: None,
            line_style: LineStyle::Dashed,
        };

        let run = run_dataset(&spec).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(run.sites[4], 4.0);
        assert_eq!(run.sites[5], 6.0);
        // Curve domain follows the shifted maximum site.
        assert!((run.curve.last().unwrap().0 - 11.0).abs() < 1e-9);
    }
}
