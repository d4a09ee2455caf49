//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - mean profile points: one marker per dataset (`o`, `x`, `+`, ...)
//! - fitted curves: `-` lines (dashed curves skip alternate segments)

use crate::app::pipeline::RunOutput;
use crate::domain::{CurveFile, LineStyle};

/// Point markers, cycled per dataset.
const MARKERS: [char; 6] = ['o', 'x', '+', '*', '#', '@'];

/// Render a plot for an in-memory run (all datasets overlaid).
pub fn render_ascii_plot(run: &RunOutput, width: usize, height: usize) -> String {
    let mut curves: Vec<(LineStyle, Vec<(f64, f64)>)> = Vec::new();
    let mut point_sets: Vec<(char, Vec<(f64, f64)>)> = Vec::new();
    let mut legend: Vec<String> = Vec::new();

    for (d_idx, ds) in run.datasets.iter().enumerate() {
        let marker = MARKERS[d_idx % MARKERS.len()];
        curves.push((ds.spec.line_style, ds.curve.clone()));

        // Draw in reverse so the fitted channel (series 0) lands on top.
        for series in ds.series.iter().rev() {
            let pts = ds
                .sites
                .iter()
                .zip(series.values.iter())
                .map(|(&x, &y)| (x, y))
                .collect();
            point_sets.push((marker, pts));
        }

        let p = &ds.fit.params;
        legend.push(format!(
            "  {marker} {}  S={:.4} M={:.4} D={:.4}",
            ds.spec.label, p.s, p.m, p.d
        ));
    }

    render_plot(&curves, &point_sets, &legend, width, height)
}

/// Render labeled analytic curves with no point overlay.
pub fn render_ascii_curves(
    curves: &[(String, LineStyle, Vec<(f64, f64)>)],
    width: usize,
    height: usize,
) -> String {
    let sets: Vec<(LineStyle, Vec<(f64, f64)>)> = curves
        .iter()
        .map(|(_, style, pts)| (*style, pts.clone()))
        .collect();
    let legend: Vec<String> = curves
        .iter()
        .map(|(label, _, _)| format!("  - {label}"))
        .collect();
    render_plot(&sets, &[], &legend, width, height)
}

/// Render a plot from a saved curve JSON file (curves only, no points).
pub fn render_ascii_plot_from_curve_file(curve: &CurveFile, width: usize, height: usize) -> String {
    let mut curves: Vec<(LineStyle, Vec<(f64, f64)>)> = Vec::new();
    let mut legend: Vec<String> = Vec::new();

    for entry in &curve.curves {
        let pts = entry
            .grid
            .sites
            .iter()
            .zip(entry.grid.y.iter())
            .map(|(&x, &y)| (x, y))
            .collect();
        curves.push((LineStyle::Solid, pts));
        let p = &entry.params;
        legend.push(format!(
            "  - {}  S={:.4} M={:.4} D={:.4}",
            entry.label, p.s, p.m, p.d
        ));
    }

    render_plot(&curves, &[], &legend, width, height)
}

fn render_plot(
    curves: &[(LineStyle, Vec<(f64, f64)>)],
    point_sets: &[(char, Vec<(f64, f64)>)],
    legend: &[String],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = x_range(curves, point_sets).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = y_range(curves, point_sets).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Curves first so points can overlay.
    for (style, pts) in curves {
        draw_curve(&mut grid, pts, *style, x_min, x_max, y_min, y_max);
    }

    for (marker, pts) in point_sets {
        for &(x, y) in pts {
            let col = map_x(x, x_min, x_max, width);
            let row = map_y(y, y_min, y_max, height);
            grid[row][col] = *marker;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: site=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    for line in legend {
        out.push_str(line);
        out.push('\n');
    }

    out
}

fn x_range(
    curves: &[(LineStyle, Vec<(f64, f64)>)],
    point_sets: &[(char, Vec<(f64, f64)>)],
) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for (_, pts) in curves {
        for &(x, _) in pts {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
        }
    }
    for (_, pts) in point_sets {
        for &(x, _) in pts {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
        }
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn y_range(
    curves: &[(LineStyle, Vec<(f64, f64)>)],
    point_sets: &[(char, Vec<(f64, f64)>)],
) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for (_, pts) in curves {
        for &(_, y) in pts {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    for (_, pts) in point_sets {
        for &(_, y) in pts {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(
    grid: &mut [Vec<char>],
    curve: &[(f64, f64)],
    style: LineStyle,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for (i, &(x, y)) in curve.iter().enumerate() {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            let visible = match style {
                LineStyle::Solid => true,
                LineStyle::Dashed => i % 2 == 1,
            };
            if visible {
                draw_line(grid, c0, r0, col, row, '-');
            }
        } else {
            grid[row][col] = '-';
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::{DatasetRun, SeriesRun};
    use crate::domain::{
        DatasetSpec, DatasetStats, FitQuality, Rgb, SgFit, SgParams, SourceSpec,
    };

    fn one_dataset_run() -> RunOutput {
        let spec = DatasetSpec {
            label: "kink".to_string(),
            source: SourceSpec::Table {
                path: "unused".into(),
                scale: 1.0,
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
            quality: FitQuality { sse: 0.0, rmse: 0.0, n: 2, iterations: 1 },
        };
        RunOutput {
            datasets: vec![DatasetRun {
                spec,
                sites: vec![0.0, 9.0],
                series: vec![SeriesRun {
                    color: Rgb::BLACK,
                    values: vec![0.0, 10.0],
                }],
                mean: vec![0.0, 10.0],
                fit,
                curve: vec![(0.0, 0.0), (9.0, 10.0)],
                stats: DatasetStats { n_samples: 1, n_sites: 2, y_min: 0.0, y_max: 10.0 },
            }],
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let txt = render_ascii_plot(&one_dataset_run(), 10, 5);
        let expected = concat!(
            "Plot: site=[0.000, 9.000] | y=[-0.50, 10.50]\n",
            "        -o\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "o-        \n",
            "  o kink  S=0.5000 M=1.0000 D=-10.0000\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn dashed_curve_draws_fewer_cells_than_solid() {
        let mut run = one_dataset_run();
        run.datasets[0].series.clear();
        // Few samples over a wide grid: each segment spans several cells, so
        // skipped segments leave visible gaps.
        run.datasets[0].curve = (0..20)
            .map(|i| {
                let x = i as f64 / 19.0 * 9.0;
                (x, x)
            })
            .collect();

        let solid = render_ascii_plot(&run, 60, 20);
        run.datasets[0].spec.line_style = LineStyle::Dashed;
        let dashed = render_ascii_plot(&run, 60, 20);

        let count = |s: &str| s.chars().filter(|&c| c == '-').count();
        // "D=-10.0000" in the legend contributes equally to both.
        assert!(count(&dashed) < count(&solid));
        assert!(count(&dashed) > 0);
    }
}
