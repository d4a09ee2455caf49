//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - builds the run configuration (preset or explicit `fit` options)
//! - runs the reduce + fit pipeline
//! - prints reports/plots or launches the TUI
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, FitArgs, OutputArgs, PlotArgs, StarArgs, SynthArgs};
use crate::domain::{
    DatasetSpec, InputFormat, LineStyle, Rgb, RunConfig, SgParams, SourceSpec, Transform,
};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `kink` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Bcc(args) => {
            let config = crate::presets::bcc(&args.data_dir)?;
            run_config(with_output(config, &args.output))
        }
        Command::Sc(args) => {
            let config = crate::presets::sc(&args.data_dir)?;
            run_config(with_output(config, &args.output))
        }
        Command::Hex(args) => {
            let config = crate::presets::hex(&args.data_dir)?;
            run_config(with_output(config, &args.output))
        }
        Command::Hexvac(args) => {
            let config = crate::presets::hexvac(&args.data_dir)?;
            run_config(with_output(config, &args.output))
        }
        Command::Fit(args) => run_config(fit_config_from_args(&args)),
        Command::Star(args) => handle_star(args),
        Command::Plot(args) => handle_plot(args),
        Command::Synth(args) => handle_synth(args),
    }
}

fn run_config(config: RunConfig) -> Result<(), AppError> {
    let run = pipeline::run(&config)?;

    // Exports are written before any rendering so a TUI session leaves the
    // same files behind as a plain run.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run)?;
    }
    if let Some(path) = &config.export_curve {
        crate::io::curve::write_curve_json(path, &run, &config)?;
    }

    if config.tui {
        return crate::tui::run(config, run);
    }

    println!("{}", crate::report::format_run_summary(&run, &config));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(&run, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;
    let plot = crate::plot::render_ascii_plot_from_curve_file(&curve, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_star(args: StarArgs) -> Result<(), AppError> {
    let curves = star_curve_sets(&args)?;
    let plot = crate::plot::render_ascii_curves(&curves, args.width, args.height);
    println!("{plot}");
    Ok(())
}

/// Sample one dashed potential curve per arm count over `(0, r_max]`.
///
/// Points above `v_max` are dropped rather than rescaling the axis; the
/// potential diverges at contact and would otherwise flatten every curve
/// into the bottom rows.
fn star_curve_sets(
    args: &StarArgs,
) -> Result<Vec<(String, LineStyle, Vec<(f64, f64)>)>, AppError> {
    const SAMPLES: usize = 1000;

    if args.arms.is_empty() {
        return Err(AppError::new(2, "Need at least one arm count."));
    }
    if !(args.sigma.is_finite() && args.sigma > 0.0) {
        return Err(AppError::new(2, format!("Sigma must be positive (got {}).", args.sigma)));
    }
    if !(args.r_max.is_finite() && args.r_max > 0.0) {
        return Err(AppError::new(2, format!("r-max must be positive (got {}).", args.r_max)));
    }
    if !(args.v_max.is_finite() && args.v_max > 0.0) {
        return Err(AppError::new(2, format!("v-max must be positive (got {}).", args.v_max)));
    }

    let curves = args
        .arms
        .iter()
        .map(|&f| {
            let points = (1..=SAMPLES)
                .filter_map(|i| {
                    let r = i as f64 / SAMPLES as f64 * args.r_max;
                    let v = crate::models::star_potential(r, f as f64, args.sigma);
                    (v <= args.v_max).then_some((r, v))
                })
                .collect();
            (format!("f={f}"), LineStyle::Dashed, points)
        })
        .collect();
    Ok(curves)
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let spec = crate::data::SynthSpec {
        rows: args.rows,
        sites: args.sites,
        params: SgParams { s: args.s, m: args.m, d: args.d },
        noise_sigma: args.noise,
        seed: args.seed,
        scale: args.scale,
    };
    let table = crate::data::generate_table(&spec)?;
    crate::io::write_table(&args.out, &table)?;
    println!(
        "Wrote {} rows x {} sites to {}",
        args.rows,
        args.sites,
        args.out.display()
    );
    Ok(())
}

fn with_output(mut config: RunConfig, output: &OutputArgs) -> RunConfig {
    config.plot = !output.no_plot;
    config.plot_width = output.width;
    config.plot_height = output.height;
    config.tui = output.tui;
    config.export_results = output.export.clone();
    config.export_curve = output.export_curve.clone();
    config
}

pub fn fit_config_from_args(args: &FitArgs) -> RunConfig {
    let source = match args.format {
        InputFormat::Axes => SourceSpec::AxisFile {
            path: args.input.clone(),
            best_n: args.best_n,
        },
        InputFormat::Table => SourceSpec::Table {
            path: args.input.clone(),
            scale: args.scale,
        },
    };

    let mut transforms = Vec::new();
    if args.roll != 0 {
        transforms.push(Transform::Roll(args.roll));
    }
    if let (Some(start), Some(delta)) = (args.shift_at, args.shift_by) {
        transforms.push(Transform::SegmentShift { start, delta });
    }
    if args.flip {
        transforms.push(Transform::Flip);
    }

    let dataset = DatasetSpec {
        label: args.label.clone(),
        source,
        transforms,
        site_shift: None,
        plot_scale: 1.0,
        colors: vec![Rgb::BLACK],
        curve_color: None,
        line_style: LineStyle::Solid,
    };

    let mut config = RunConfig {
        title: format!("Sine-Gordon fit - {}", args.label),
        x_label: "site".to_string(),
        y_label: "<u>/a".to_string(),
        datasets: vec![dataset],
        plot: true,
        plot_width: 100,
        plot_height: 25,
        tui: false,
        export_results: None,
        export_curve: None,
    };
    config = with_output(config, &args.output);
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn default_output() -> OutputArgs {
        OutputArgs {
            no_plot: false,
            width: 100,
            height: 25,
            tui: false,
            export: None,
            export_curve: None,
        }
    }

    #[test]
    fn fit_args_map_to_one_dataset_config() {
        let args = FitArgs {
            input: PathBuf::from("saved/hex_offsets0"),
            format: InputFormat::Table,
            best_n: 1,
            scale: 3.0,
            roll: 5,
            shift_at: Some(10),
            shift_by: Some(1.0),
            flip: true,
            label: "hex0".to_string(),
            output: default_output(),
        };

        let config = fit_config_from_args(&args);
        assert_eq!(config.datasets.len(), 1);
        let ds = &config.datasets[0];
        assert_eq!(
            ds.transforms,
            vec![
                Transform::Roll(5),
                Transform::SegmentShift { start: 10, delta: 1.0 },
                Transform::Flip,
            ]
        );
        match &ds.source {
            SourceSpec::Table { scale, .. } => assert!((scale - 3.0).abs() < 1e-12),
            _ => panic!("table format expected"),
        }
        assert!(config.plot);
    }

    fn default_star_args() -> StarArgs {
        StarArgs {
            arms: vec![18, 32, 64, 128, 256],
            sigma: 1.0,
            r_max: 3.0,
            v_max: 140.0,
            width: 100,
            height: 25,
        }
    }

    #[test]
    fn star_curves_cover_all_arm_counts_clipped_to_view() {
        let curves = star_curve_sets(&default_star_args()).unwrap();
        assert_eq!(curves.len(), 5);
        assert_eq!(curves[0].0, "f=18");
        assert_eq!(curves[4].0, "f=256");
        for (label, style, points) in &curves {
            assert_eq!(*style, LineStyle::Dashed);
            assert!(!points.is_empty(), "{label}");
            for &(r, v) in points {
                assert!(r > 0.0 && r <= 3.0, "{label}: r={r}");
                assert!(v > 0.0 && v <= 140.0, "{label}: v={v}");
            }
        }
        // The divergent inner region is clipped hardest for the stiffest star.
        assert!(curves[4].2.len() < curves[0].2.len());
    }

    #[test]
    fn star_rejects_degenerate_arguments() {
        let mut args = default_star_args();
        args.arms.clear();
        assert_eq!(star_curve_sets(&args).unwrap_err().exit_code(), 2);

        let mut args = default_star_args();
        args.sigma = 0.0;
        assert_eq!(star_curve_sets(&args).unwrap_err().exit_code(), 2);

        let mut args = default_star_args();
        args.v_max = f64::NAN;
        assert_eq!(star_curve_sets(&args).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn no_plot_disables_the_terminal_plot() {
        let mut output = default_output();
        output.no_plot = true;
        let args = FitArgs {
            input: PathBuf::from("x"),
            format: InputFormat::Axes,
            best_n: 2,
            scale: 1.0,
            roll: 0,
            shift_at: None,
            shift_by: None,
            flip: false,
            label: "x".to_string(),
            output,
        };
        let config = fit_config_from_args(&args);
        assert!(!config.plot);
        assert!(config.datasets[0].transforms.is_empty());
    }
}
