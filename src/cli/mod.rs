//! Command-line parsing for the kink profile fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::InputFormat;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "kink", version, about = "Lattice displacement profile sine-Gordon fitter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// BCC crowdion preset (`saved/bcc_offsets`, best 4 axes).
    Bcc(PresetArgs),
    /// SC vacancy preset (`sim/test/sc_offsets`, best 3 axes, plotted as -m/a).
    Sc(PresetArgs),
    /// Hexagonal vacancy preset (five temperatures, one fit each).
    Hex(PresetArgs),
    /// Hexagonal vacancy preset at rho sigma^3=4.0 (runs 0/2/4, run 2 flipped).
    Hexvac(PresetArgs),
    /// Fit a single profile file with explicit reduction/transform options.
    Fit(FitArgs),
    /// Draw the closed-form star-polymer pair potential (no input data).
    Star(StarArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
    /// Generate a synthetic offsets table (for testing the pipeline end to end).
    Synth(SynthArgs),
}

/// Options shared by every preset.
#[derive(Debug, Args, Clone)]
pub struct PresetArgs {
    /// Directory the preset's input paths are resolved against.
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for fitting one explicitly-described input file.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Input profile file.
    pub input: PathBuf,

    /// Input format.
    #[arg(long, value_enum, default_value_t = InputFormat::Axes)]
    pub format: InputFormat,

    /// Keep the N most-displaced axes per line (axes format only).
    #[arg(long, default_value_t = 1)]
    pub best_n: usize,

    /// Divide the mean profile by this factor (table format only).
    #[arg(long, default_value_t = 1.0)]
    pub scale: f64,

    /// Cyclically rotate the mean profile by K sites before fitting.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub roll: i64,

    /// Start index of a suffix shift applied to the profile values.
    #[arg(long, requires = "shift_by")]
    pub shift_at: Option<usize>,

    /// Amount added to every profile value from --shift-at onward.
    #[arg(long, requires = "shift_at", allow_hyphen_values = true)]
    pub shift_by: Option<f64>,

    /// Flip the profile orientation (m <- 1 - m) after shifting.
    #[arg(long)]
    pub flip: bool,

    /// Dataset label used in reports and plots.
    #[arg(long, default_value = "profile")]
    pub label: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Output options shared by the presets and `fit`.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Disable the terminal plot (rendered by default).
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Render results in the interactive TUI instead of plain text.
    #[arg(long)]
    pub tui: bool,

    /// Export per-site results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export fitted curves (params + quality + sampled grid) to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,
}

/// Options for the star-polymer potential figure.
#[derive(Debug, Args, Clone)]
pub struct StarArgs {
    /// Arm counts f, one dashed curve each.
    #[arg(long, value_delimiter = ',', default_values_t = [18u32, 32, 64, 128, 256])]
    pub arms: Vec<u32>,

    /// Corona diameter sigma (r is plotted in units of sigma).
    #[arg(long, default_value_t = 1.0)]
    pub sigma: f64,

    /// Upper end of the r axis.
    #[arg(long = "r-max", default_value_t = 3.0)]
    pub r_max: f64,

    /// Clip the view above this potential (it diverges at contact).
    #[arg(long = "v-max", default_value_t = 140.0)]
    pub v_max: f64,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for plotting a saved curve.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Curve JSON file produced by `--export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for generating a synthetic offsets table.
#[derive(Debug, Args)]
pub struct SynthArgs {
    /// Output table path.
    pub out: PathBuf,

    /// Number of sample rows.
    #[arg(long, default_value_t = 100)]
    pub rows: usize,

    /// Number of lattice sites per row.
    #[arg(long, default_value_t = 19)]
    pub sites: usize,

    /// True scale S.
    #[arg(long, default_value_t = 0.5)]
    pub s: f64,

    /// True slope M.
    #[arg(long, default_value_t = 1.0)]
    pub m: f64,

    /// True intercept D.
    #[arg(long, default_value_t = -10.0, allow_hyphen_values = true)]
    pub d: f64,

    /// Gaussian noise sigma added to each value.
    #[arg(long, default_value_t = 0.01)]
    pub noise: f64,

    /// RNG seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Stored values are multiplied by this factor (the readers divide it out).
    #[arg(long, default_value_t = 3.0)]
    pub scale: f64,
}
