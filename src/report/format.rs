//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::RunOutput;
use crate::domain::RunConfig;

/// Format the full run summary (dataset stats + fit parameters).
pub fn format_run_summary(run: &RunOutput, config: &RunConfig) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== kink - {} ===\n", config.title));

    for ds in &run.datasets {
        out.push_str(&format!("\n[{}] {}\n", ds.spec.label, ds.spec.source.path().display()));
        out.push_str(&format!(
            "  samples: n={} | sites: {} | <u>/a range: [{:.4}, {:.4}]\n",
            ds.stats.n_samples, ds.stats.n_sites, ds.stats.y_min, ds.stats.y_max
        ));
        let p = &ds.fit.params;
        out.push_str(&format!(
            "  fit: S={:.6} M={:.6} D={:.6}\n",
            p.s, p.m, p.d
        ));
        out.push_str(&format!(
            "  kink width 1/M = {:.4} sites | core at site {:.4}\n",
            p.kink_width(),
            p.core_site()
        ));
        out.push_str(&format!(
            "  rmse={:.6} sse={:.6} ({} iterations)\n",
            ds.fit.quality.rmse, ds.fit.quality.sse, ds.fit.quality.iterations
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::{DatasetRun, SeriesRun};
    use crate::domain::{
        DatasetSpec, DatasetStats, FitQuality, LineStyle, Rgb, SgFit, SgParams, SourceSpec,
    };

    fn dummy_run() -> RunOutput {
        let spec = DatasetSpec {
            label: "beta=0.000".to_string(),
            source: SourceSpec::Table {
                path: "saved/hex_offsets0".into(),
                scale: 3.0,
            },
            transforms: vec![],
            site_shift: None,
            plot_scale: 1.0,
            colors: vec![Rgb::BLACK],
            curve_color: None,
            line_style: LineStyle::Solid,
        };
        let fit = SgFit {
            params: SgParams { s: 0.5, m: 1.0, d: -10.0 },
            covariance: [[0.0; 3]; 3],
            quality: FitQuality { sse: 0.001, rmse: 0.007, n: 19, iterations: 12 },
        };
        RunOutput {
            datasets: vec![DatasetRun {
                spec,
                sites: vec![0.0, 1.0],
                series: vec![SeriesRun { color: Rgb::BLACK, values: vec![0.0, 0.1] }],
                mean: vec![0.0, 0.1],
                fit,
                curve: vec![(0.0, 0.0), (2.0, 0.5)],
                stats: DatasetStats { n_samples: 40, n_sites: 19, y_min: 0.0, y_max: 0.1 },
            }],
        }
    }

    fn dummy_config() -> RunConfig {
        RunConfig {
            title: "Hexagonal vacancy".to_string(),
            x_label: "site".to_string(),
            y_label: "<u>/a".to_string(),
            datasets: vec![],
            plot: false,
            plot_width: 80,
            plot_height: 20,
            tui: false,
            export_results: None,
            export_curve: None,
        }
    }

    #[test]
    fn summary_includes_fit_parameters_and_diagnostics() {
        let text = format_run_summary(&dummy_run(), &dummy_config());
        assert!(text.contains("Hexagonal vacancy"));
        assert!(text.contains("beta=0.000"));
        assert!(text.contains("S=0.500000"));
        assert!(text.contains("kink width 1/M = 1.0000"));
        assert!(text.contains("core at site 10.0000"));
    }
}
