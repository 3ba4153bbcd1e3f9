//! Terminal chart viewer.
//!
//! After the PNG is saved the chart is shown in a Ratatui screen: the fitted
//! law and the epochs in log-log space (x inverted, like the PNG), with the
//! per-epoch table alongside. `q` or `Esc` closes it.
//!
//! When stdout is not a terminal the viewer is a no-op.

use std::io::{self, IsTerminal};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tracing::debug;

use crate::app::pipeline::AnalysisOutput;
use crate::error::AppError;
use crate::render::layout::{LogLogFrame, format_x_tick, format_y_tick};
use crate::report::format_epoch_table;

mod chart_widget;

use chart_widget::EpochChart;

/// Show the viewer if stdout is an interactive terminal.
pub fn show(output: &AnalysisOutput, saved_as: &str) -> Result<(), AppError> {
    if !io::stdout().is_terminal() {
        debug!("stdout is not a terminal; skipping viewer");
        return Ok(());
    }

    let Some(series) = ViewerSeries::new(output) else {
        debug!("nothing to show in the viewer");
        return Ok(());
    };

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::render(format!("Failed to initialize terminal: {e}")))?;

    let viewer = Viewer {
        output,
        series,
        saved_as,
    };
    viewer.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::render(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::render(format!("Failed to enter alternate screen: {e}")));
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

/// Chart-space series and bounds for the widget.
#[derive(Debug, Clone, PartialEq)]
struct ViewerSeries {
    points: Vec<(f64, f64)>,
    curve: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl ViewerSeries {
    fn new(output: &AnalysisOutput) -> Option<Self> {
        let frame = LogLogFrame::from_data(&output.series, &output.curve)?;
        let x = frame.x_range();
        let y = frame.y_range();
        Some(Self {
            points: output.series.points().map(|p| frame.to_chart(p)).collect(),
            curve: output
                .curve
                .points()
                .filter(|&(_, y)| y > 0.0 && y.is_finite())
                .map(|p| frame.to_chart(p))
                .collect(),
            x_bounds: [x.start, x.end],
            y_bounds: [y.start, y.end],
        })
    }
}

struct Viewer<'a> {
    output: &'a AnalysisOutput,
    series: ViewerSeries,
    saved_as: &'a str,
}

impl Viewer<'_> {
    fn event_loop<B: ratatui::backend::Backend>(&self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::render(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::render(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::render(format!("Event read error: {e}")))? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                        break;
                    }
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let fit = &self.output.fit;
        let lines = vec![
            Line::from(vec![
                Span::styled("The Joule Standard", Style::default().fg(Color::Cyan)),
                Span::raw(" | G · E = k"),
            ]),
            Line::from(Span::styled(
                format!(
                    "slope={:.4} ± {:.4} | R²={:.4} | p={:.2e} | k={:.4e} | n={}",
                    fit.slope,
                    fit.std_err,
                    fit.r_squared(),
                    fit.p_value,
                    fit.constant_k(),
                    fit.n,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::LEFT | Borders::RIGHT | Borders::TOP));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(66)])
            .split(area);

        self.draw_chart(frame, chunks[0]);

        let table = format_epoch_table(&self.output.records, &self.output.fit);
        let p = Paragraph::new(table).block(Block::default().title("Epochs").borders(Borders::ALL));
        frame.render_widget(p, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Granularity vs energy cost (log-log)")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let (chart_rect, insets) = chart_layout(inner);
        let widget = EpochChart {
            curve: &self.series.curve,
            points: &self.series.points,
            x_bounds: self.series.x_bounds,
            y_bounds: self.series.y_bounds,
        };
        frame.render_widget(widget, chart_rect);

        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, self.series.x_bounds, self.series.y_bounds);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("q/Esc quit", Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(format!("saved {}", self.saved_as), Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 9,
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

/// Whole decades inside `[lo, hi]` (log10 units), ascending.
fn decade_ticks(lo: f64, hi: f64) -> Vec<f64> {
    if !(lo.is_finite() && hi.is_finite()) || hi < lo {
        return Vec::new();
    }
    (lo.ceil() as i32..=hi.floor() as i32).map(f64::from).collect()
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let style = Style::default().fg(Color::Gray);
    let x_span = x_bounds[1] - x_bounds[0];
    let y_span = y_bounds[1] - y_bounds[0];

    // Every other decade keeps x labels from colliding on narrow terminals.
    for u in decade_ticks(x_bounds[0], x_bounds[1]).into_iter().step_by(2) {
        let frac = (u - x_bounds[0]) / x_span;
        let x = chart.x + ((chart.width - 1) as f64 * frac).round() as u16;
        let label = format_x_tick(u);
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 || start + label_len > inner.x + inner.width {
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

    for v in decade_ticks(y_bounds[0], y_bounds[1]) {
        let frac = (v - y_bounds[0]) / y_span;
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * frac).round() as u16;
        let label = format_y_tick(v);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
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

    let x_label = Paragraph::new("E: labor-hours per GJ (cheaper →)")
        .alignment(Alignment::Center)
        .style(style);
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("G ($)").style(style.add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_analysis;
    use crate::data::EPOCHS;

    #[test]
    fn series_are_in_chart_space() {
        let output = run_analysis(&EPOCHS).unwrap();
        let series = ViewerSeries::new(&output).unwrap();
        assert_eq!(series.points.len(), 6);
        assert_eq!(series.curve.len(), 100);
        // Neolithic (x = 5000) is left of Digital (x = 0.001).
        assert!(series.points[0].0 < series.points[5].0);
        assert!(series.x_bounds[0] < series.x_bounds[1]);
        assert!((series.y_bounds[0] - -6.0).abs() < 1e-12);
        assert!((series.y_bounds[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn chart_layout_reserves_insets_when_roomy() {
        let inner = Rect::new(0, 0, 80, 30);
        let (rect, insets) = chart_layout(inner);
        assert!(insets.is_some());
        assert_eq!(rect, Rect::new(9, 1, 69, 27));

        let (rect, insets) = chart_layout(Rect::new(0, 0, 15, 6));
        assert!(insets.is_none());
        assert_eq!(rect, Rect::new(0, 0, 15, 6));
    }

    #[test]
    fn decade_ticks_are_whole_and_inside() {
        assert_eq!(decade_ticks(-4.4, 3.7), vec![-4.0, -3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0]);
        assert_eq!(decade_ticks(-6.0, -6.0), vec![-6.0]);
        assert!(decade_ticks(1.0, 0.0).is_empty());
    }
}
