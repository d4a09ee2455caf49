//! Built-in analysis presets.
//!
//! Each preset pins down one published figure: the input file layout, which
//! axes to keep, the unwrap shifts that remove the periodic-image jump in the
//! raw offsets, and the display scaling/colors. The numeric literals are
//! lattice constants of the corresponding simulation, not tunables.

use std::path::{Path, PathBuf};

use crate::domain::{DatasetSpec, LineStyle, Rgb, RunConfig, SourceSpec, Transform};
use crate::error::AppError;
use crate::io::load_axis_lines;

/// BCC crowdion lattice constant along the <111> axis.
fn bcc_lattice_constant() -> f64 {
    1.5 * 3.0_f64.sqrt()
}

/// SC vacancy lattice constant.
const SC_LATTICE_CONSTANT: f64 = 3.0;

/// Every hex offsets table stores displacements in thirds of a cell.
const HEX_OFFSET_SCALE: f64 = 3.0;

/// Hex profiles are recorded relative to the vacancy; rolling by 5 re-centers
/// the kink inside the 19-site window.
const HEX_ROLL: i64 = 5;

/// BCC crowdion: best 4 axes of `saved/bcc_offsets`, sine-Gordon fit on the
/// most-displaced one.
///
/// The file length is needed up front because the unwrap shift starts at
/// `len/2 + 1`, so the input is read once here to size it.
pub fn bcc(data_dir: &Path) -> Result<RunConfig, AppError> {
    let path = data_dir.join("saved/bcc_offsets");
    let n_sites = axis_profile_len(&path)?;
    let a = bcc_lattice_constant();

    let dataset = DatasetSpec {
        label: "bcc".to_string(),
        source: SourceSpec::AxisFile { path, best_n: 4 },
        transforms: vec![Transform::SegmentShift {
            start: n_sites / 2 + 1,
            delta: -a,
        }],
        site_shift: None,
        plot_scale: 1.0,
        // Matplotlib's default cycle, best axis first.
        colors: vec![
            Rgb(0x1f, 0x77, 0xb4),
            Rgb(0xff, 0x7f, 0x0e),
            Rgb(0x2c, 0xa0, 0x2c),
            Rgb(0xd6, 0x27, 0x28),
        ],
        curve_color: Some(Rgb::BLACK),
        line_style: LineStyle::Solid,
    };

    Ok(base_config(
        "BCC crowdion, mean displacement and sine-Gordon fit",
        vec![dataset],
    ))
}

/// SC vacancy: best 3 axes of `sim/test/sc_offsets`, displayed as `-m/a`.
pub fn sc(data_dir: &Path) -> Result<RunConfig, AppError> {
    let path = data_dir.join("sim/test/sc_offsets");
    let n_sites = axis_profile_len(&path)?;
    let half = n_sites / 2;

    let dataset = DatasetSpec {
        label: "sc".to_string(),
        source: SourceSpec::AxisFile { path, best_n: 3 },
        transforms: vec![Transform::SegmentShift {
            start: half,
            delta: SC_LATTICE_CONSTANT,
        }],
        // The site axis skips one index across the vacancy.
        site_shift: Some((half, 1.0)),
        plot_scale: -1.0 / SC_LATTICE_CONSTANT,
        colors: vec![
            Rgb::BLACK,
            Rgb(0x66, 0x66, 0x66),
            Rgb(0x99, 0x99, 0x99),
        ],
        curve_color: Some(Rgb::BLACK),
        line_style: LineStyle::Dashed,
    };

    Ok(base_config(
        "SC vacancy, mean displacement and sine-Gordon fit (rho sigma^3=5.2, kT/e=0.001)",
        vec![dataset],
    ))
}

/// Hexagonal vacancy: five temperatures, one fit per file.
pub fn hex(data_dir: &Path) -> Result<RunConfig, AppError> {
    let greys = [0x00, 0x22, 0x44, 0x66, 0x88];
    let datasets = greys
        .iter()
        .enumerate()
        .map(|(i, &g)| DatasetSpec {
            label: format!("beta=0.00{i}"),
            source: SourceSpec::Table {
                path: hex_offsets_path(data_dir, i),
                scale: HEX_OFFSET_SCALE,
            },
            transforms: vec![
                Transform::Roll(HEX_ROLL),
                Transform::SegmentShift { start: 10, delta: 1.0 },
            ],
            site_shift: None,
            plot_scale: 1.0,
            colors: vec![Rgb(g, g, g)],
            curve_color: None,
            line_style: LineStyle::Solid,
        })
        .collect();

    Ok(base_config(
        "Hexagonal vacancy - projection on p3 with sine-gordon fit",
        datasets,
    ))
}

/// Hexagonal vacancy at rho sigma^3=4.0: temperatures 0.000/0.002/0.004.
///
/// The 0.002 run nucleated the kink with the opposite orientation; it is
/// flipped so all three profiles rise in the same direction.
pub fn hexvac(data_dir: &Path) -> Result<RunConfig, AppError> {
    let runs: [(usize, Rgb, bool); 3] = [
        (0, Rgb::BLACK, false),
        (2, Rgb(0x00, 0x7f, 0xff), true),
        (4, Rgb(0x88, 0x88, 0x88), false),
    ];

    let datasets = runs
        .iter()
        .map(|&(i, color, flip)| {
            let mut transforms = vec![
                Transform::Roll(HEX_ROLL),
                Transform::SegmentShift { start: 10, delta: 1.0 },
            ];
            if flip {
                transforms.push(Transform::Flip);
            }
            DatasetSpec {
                label: format!("kT/e=0.00{i}"),
                source: SourceSpec::Table {
                    path: hex_offsets_path(data_dir, i),
                    scale: HEX_OFFSET_SCALE,
                },
                transforms,
                site_shift: Some((10, 1.0)),
                plot_scale: 1.0,
                colors: vec![color],
                curve_color: None,
                line_style: LineStyle::Dashed,
            }
        })
        .collect();

    Ok(base_config(
        "Hexagonal vacancy - p3 offset with sine-gordon fit at rho sigma^3=4.0",
        datasets,
    ))
}

fn hex_offsets_path(data_dir: &Path, index: usize) -> PathBuf {
    data_dir.join(format!("saved/hex_offsets{index}"))
}

fn base_config(title: &str, datasets: Vec<DatasetSpec>) -> RunConfig {
    RunConfig {
        title: title.to_string(),
        x_label: "site".to_string(),
        y_label: "<u>/a".to_string(),
        datasets,
        plot: true,
        plot_width: 100,
        plot_height: 25,
        tui: false,
        export_results: None,
        export_curve: None,
    }
}

/// Number of sites per axis in a multi-axis offsets file.
///
/// Sized from the last (best) axis of the first line, the same channel the
/// reducer averages and the fitter consumes.
fn axis_profile_len(path: &Path) -> Result<usize, AppError> {
    let lines = load_axis_lines(path)?;
    let best = lines
        .first()
        .and_then(|axes| axes.last())
        .ok_or_else(|| {
            AppError::new(3, format!("'{}' contains no axis records.", path.display()))
        })?;
    Ok(best.len())
}
