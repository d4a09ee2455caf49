//! Ratatui-based terminal UI.
//!
//! The TUI renders the fitted profiles interactively: left/right cycles
//! between "all datasets" and each single dataset, and `r` reloads the input
//! files and refits.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Terminal,
};

use crate::app::pipeline::RunOutput;
use crate::domain::{LineStyle, Rgb, RunConfig};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::{ChartCurve, ChartPoints, KinkPlottersChart};

/// Start the TUI on an already-computed run.
pub fn run(config: RunConfig, run: RunOutput) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = ratatui::backend::CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, run);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: RunConfig,
    run: RunOutput,
    /// 0 = all datasets, 1..=n = single dataset.
    selected: usize,
    status: String,
}

impl App {
    fn new(config: RunConfig, run: RunOutput) -> Self {
        Self {
            config,
            run,
            selected: 0,
            status: "Ready.".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        let n = self.run.datasets.len();
        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Left => {
                self.selected = if self.selected == 0 { n } else { self.selected - 1 };
                self.status = self.selection_name();
            }
            KeyCode::Right => {
                self.selected = if self.selected >= n { 0 } else { self.selected + 1 };
                self.status = self.selection_name();
            }
            KeyCode::Char('r') => {
                match crate::app::pipeline::run(&self.config) {
                    Ok(run) => {
                        self.run = run;
                        self.status = "Reloaded inputs and refitted.".to_string();
                    }
                    Err(err) => {
                        self.status = format!("Reload failed: {err}");
                    }
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn selection_name(&self) -> String {
        if self.selected == 0 {
            "all datasets".to_string()
        } else {
            self.run.datasets[self.selected - 1].spec.label.clone()
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("kink", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" — {}", self.config.title)),
        ]));

        lines.push(Line::from(Span::styled(
            format!(
                "showing: {} | datasets: {}",
                self.selection_name(),
                self.run.datasets.len()
            ),
            Style::default().fg(Color::Gray),
        )));

        if let Some(ds) = self.selected.checked_sub(1).map(|i| &self.run.datasets[i]) {
            let p = &ds.fit.params;
            lines.push(Line::from(Span::styled(
                format!(
                    "S={:.4} M={:.4} D={:.4} | width 1/M={:.3} | core at {:.3} | rmse={:.5}",
                    p.s,
                    p.m,
                    p.d,
                    p.kink_width(),
                    p.core_site(),
                    ds.fit.quality.rmse,
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Profile").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some((curves, points, x_bounds, y_bounds)) = chart_series(&self.run, self.selected)
        else {
            let msg = Paragraph::new("No plottable data.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let (chart_rect, insets) = chart_layout(inner);
        let widget = KinkPlottersChart {
            curves: &curves,
            points: &points,
            x_bounds,
            y_bounds,
            x_label: &self.config.x_label,
            y_label: self.config.y_label.clone(),
            fmt_x: fmt_axis,
            fmt_y: fmt_axis,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(
                frame,
                inner,
                chart_rect,
                insets,
                x_bounds,
                y_bounds,
                &self.config.x_label,
                &self.config.y_label,
            );
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ dataset  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Build chart series for Plotters.
///
/// `selected == 0` includes every dataset, otherwise only dataset
/// `selected - 1`.
fn chart_series(
    run: &RunOutput,
    selected: usize,
) -> Option<(Vec<ChartCurve>, Vec<ChartPoints>, [f64; 2], [f64; 2])> {
    let included: Vec<_> = run
        .datasets
        .iter()
        .enumerate()
        .filter(|(i, _)| selected == 0 || *i == selected - 1)
        .map(|(_, ds)| ds)
        .collect();

    let mut curves = Vec::new();
    let mut points = Vec::new();
    let mut x_max = f64::NEG_INFINITY;
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);

    for ds in &included {
        curves.push(ChartCurve {
            color: terminal_color(ds.spec.fit_color()),
            dashed: ds.spec.line_style == LineStyle::Dashed,
            points: ds.curve.clone(),
        });
        for &(x, y) in &ds.curve {
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        for series in &ds.series {
            let pts: Vec<(f64, f64)> = ds
                .sites
                .iter()
                .zip(series.values.iter())
                .map(|(&x, &y)| (x, y))
                .collect();
            for &(x, y) in &pts {
                x_max = x_max.max(x);
                y_min = y_min.min(y);
                y_max = y_max.max(y);
            }
            points.push(ChartPoints {
                color: terminal_color(series.color),
                points: pts,
            });
        }
    }

    if !x_max.is_finite() || x_max <= 0.0 {
        return None;
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        return None;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    Some((curves, points, [0.0, x_max], [y_min - pad, y_max + pad]))
}

/// The published palettes are near-black; dark markers are invisible on dark
/// terminal backgrounds, so each channel is lifted to a readable floor.
fn terminal_color(c: Rgb) -> Rgb {
    if c.0 < 0x40 && c.1 < 0x40 && c.2 < 0x40 {
        Rgb(c.0.max(0xc0), c.1.max(0xc0), c.2.max(0xc0))
    } else {
        c
    }
}

fn fmt_axis(v: f64) -> String {
    format!("{v:.2}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

#[allow(clippy::too_many_arguments)]
fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    x_label: &str,
    y_label: &str,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = format!("{:.1}", x_val);
        let label_len = label.len() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{:.2}", y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_title = Paragraph::new(x_label.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_title, x_rect);
    }

    let y_title = Paragraph::new(y_label.to_string())
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_title, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::{DatasetRun, SeriesRun};
    use crate::domain::{
        DatasetSpec, DatasetStats, FitQuality, SgFit, SgParams, SourceSpec,
    };

    fn two_dataset_run() -> RunOutput {
        let mk = |label: &str| DatasetRun {
            spec: DatasetSpec {
                label: label.to_string(),
                source: SourceSpec::Table { path: "unused".into(), scale: 1.0 },
                transforms: vec![],
                site_shift: None,
                plot_scale: 1.0,
                colors: vec![Rgb::BLACK],
                curve_color: None,
                line_style: LineStyle::Solid,
            },
            sites: vec![0.0, 1.0, 2.0],
            series: vec![SeriesRun { color: Rgb::BLACK, values: vec![0.0, 0.5, 1.0] }],
            mean: vec![0.0, 0.5, 1.0],
            fit: SgFit {
                params: SgParams { s: 0.5, m: 1.0, d: -1.0 },
                covariance: [[0.0; 3]; 3],
                quality: FitQuality { sse: 0.0, rmse: 0.0, n: 3, iterations: 1 },
            },
            curve: vec![(0.0, 0.0), (3.0, 1.0)],
            stats: DatasetStats { n_samples: 1, n_sites: 3, y_min: 0.0, y_max: 1.0 },
        };
        RunOutput { datasets: vec![mk("a"), mk("b")] }
    }

    #[test]
    fn chart_series_selects_all_or_one() {
        let run = two_dataset_run();

        let (curves, points, x_bounds, _) = chart_series(&run, 0).unwrap();
        assert_eq!(curves.len(), 2);
        assert_eq!(points.len(), 2);
        assert_eq!(x_bounds, [0.0, 3.0]);

        let (curves, points, _, _) = chart_series(&run, 2).unwrap();
        assert_eq!(curves.len(), 1);
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn dark_colors_are_lifted_for_terminals() {
        assert_eq!(terminal_color(Rgb::BLACK), Rgb(0xc0, 0xc0, 0xc0));
        assert_eq!(terminal_color(Rgb(0x88, 0x88, 0x88)), Rgb(0x88, 0x88, 0x88));
    }
}
