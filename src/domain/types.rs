//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during reduction and fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One parsed axis record from a multi-axis offsets line.
///
/// The simulation writes, per measured axis, a label followed by alternating
/// `(state, offset)` pairs: the crowdion state (-1/0/+1) and the projected
/// displacement of each traced particle. `state` and `offset` always have the
/// same length; the parser enforces this.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub label: String,
    pub state: Vec<f64>,
    pub offset: Vec<f64>,
}

impl Axis {
    /// Number of sites sampled along this axis.
    pub fn len(&self) -> usize {
        self.offset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offset.is_empty()
    }
}

/// Sine-Gordon kink parameters: `f(x) = s * atan(exp(m*x + d))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SgParams {
    /// Scale `S` (the kink amplitude is `S * pi / 2`).
    pub s: f64,
    /// Slope `M` (inverse kink width).
    pub m: f64,
    /// Intercept `D` (the kink core sits at `x = -D/M`).
    pub d: f64,
}

impl SgParams {
    /// Kink width `1/M` in site units.
    pub fn kink_width(&self) -> f64 {
        1.0 / self.m
    }

    /// Site index of the kink core (`f` crosses half-amplitude there).
    pub fn core_site(&self) -> f64 {
        -self.d / self.m
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub n: usize,
    pub iterations: usize,
}

/// A fitted sine-Gordon curve: parameters, covariance, and quality.
///
/// The covariance matrix (row-major 3x3, parameter order `s, m, d`) is
/// estimated from `(J^T J)^-1 * mse` at the solution. It is reported for
/// completeness; nothing downstream consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SgFit {
    pub params: SgParams,
    pub covariance: [[f64; 3]; 3],
    pub quality: FitQuality,
}

/// Elementwise profile transform, applied in preset order before fitting.
///
/// Order matters: a roll changes which indices a later segment shift hits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Cyclic rotation by `k` (numpy `np.roll` semantics: positive `k`
    /// moves elements toward higher indices).
    Roll(i64),
    /// Add `delta` to every element from `start` to the end.
    SegmentShift { start: usize, delta: f64 },
    /// Orientation flip: `m <- 1 - m`.
    Flip,
}

/// Textual input format for the generic `fit` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Multi-axis-per-line text (`label s1 o1 s2 o2 ...` groups joined by `" : "`).
    Axes,
    /// Whitespace-delimited rectangular numeric table (rows = trials).
    Table,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Axes => write!(f, "axes"),
            InputFormat::Table => write!(f, "table"),
        }
    }
}

/// Line style for the fitted curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// RGB color, parsed from `#rrggbb` hex literals in the presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Parse a `#rrggbb` literal. Returns `None` on malformed input.
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Rgb(r, g, b))
    }
}

/// Where a dataset's raw samples come from.
#[derive(Debug, Clone)]
pub enum SourceSpec {
    /// Multi-axis-per-line text file; keep the `best_n` most-displaced axes
    /// per line (the writer sorts axes ascending by total |offset|, so these
    /// are the last `best_n` entries).
    AxisFile { path: PathBuf, best_n: usize },
    /// Rectangular numeric table; mean over rows, divided by `scale`.
    Table { path: PathBuf, scale: f64 },
}

impl SourceSpec {
    pub fn path(&self) -> &std::path::Path {
        match self {
            SourceSpec::AxisFile { path, .. } => path,
            SourceSpec::Table { path, .. } => path,
        }
    }
}

/// One dataset of a run: a source file plus its fixed per-preset literals.
#[derive(Debug, Clone)]
pub struct DatasetSpec {
    pub label: String,
    pub source: SourceSpec,
    pub transforms: Vec<Transform>,
    /// Suffix shift applied to the site index axis: `sites[start..] += delta`.
    pub site_shift: Option<(usize, f64)>,
    /// Scale applied to *displayed* values only; the fit always runs on the
    /// transformed mean profile (the SC script plots `-m/a` but fits `m`).
    pub plot_scale: f64,
    /// Per-series marker colors (cycled when a source yields several axes).
    pub colors: Vec<Rgb>,
    /// Curve color override; defaults to `colors[0]`.
    pub curve_color: Option<Rgb>,
    pub line_style: LineStyle,
}

impl DatasetSpec {
    /// Marker color for plotted series `idx`.
    pub fn series_color(&self, idx: usize) -> Rgb {
        if self.colors.is_empty() {
            Rgb::BLACK
        } else {
            self.colors[idx % self.colors.len()]
        }
    }

    /// Color of the fitted curve.
    pub fn fit_color(&self) -> Rgb {
        self.curve_color.unwrap_or_else(|| self.series_color(0))
    }
}

/// Summary stats about the samples actually used for a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStats {
    /// Number of independent samples averaged (lines or table rows).
    pub n_samples: usize,
    /// Number of lattice sites in the mean profile.
    pub n_sites: usize,
    pub y_min: f64,
    pub y_max: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from a preset plus CLI overrides.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub datasets: Vec<DatasetSpec>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub tui: bool,

    pub export_results: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub curves: Vec<CurveEntry>,
}

/// One fitted curve inside a `CurveFile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveEntry {
    pub label: String,
    pub params: SgParams,
    pub quality: FitQuality,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub sites: Vec<f64>,
    pub y: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_parses_hex_literals() {
        assert_eq!(Rgb::from_hex("#007fff"), Some(Rgb(0, 0x7f, 0xff)));
        assert_eq!(Rgb::from_hex("#000000"), Some(Rgb::BLACK));
        assert_eq!(Rgb::from_hex("007fff"), None);
        assert_eq!(Rgb::from_hex("#00ff"), None);
    }

    #[test]
    fn kink_diagnostics() {
        let p = SgParams { s: 0.5, m: 2.0, d: -10.0 };
        assert!((p.kink_width() - 0.5).abs() < 1e-12);
        assert!((p.core_site() - 5.0).abs() < 1e-12);
    }
}
