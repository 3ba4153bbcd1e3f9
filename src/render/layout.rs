//! Chart geometry: log-log frame, grid lines, tick labels, annotation offsets.
//!
//! Plotting happens in "chart space": `u = -log10(x)` and `v = log10(y)`.
//! Negating the x logarithm inverts the axis, so high energy cost sits on the
//! left and cheap energy ("progress") on the right, while the coordinate range
//! stays increasing.
//!
//! Everything here is pure so layout decisions can be tested without drawing.

use std::ops::Range;

use crate::data::EpochSeries;
use crate::data::epochs::extent;
use crate::domain::{AXIS_PADDING, FitCurve};

/// Annotation offset (points) for even-indexed records: right and up.
pub const EVEN_OFFSET_PT: (f64, f64) = (10.0, 5.0);

/// Annotation offset (points) for odd-indexed records: right and down.
pub const ODD_OFFSET_PT: (f64, f64) = (10.0, -20.0);

/// Formula callout anchor in axes fractions (0 = left/bottom, 1 = right/top).
pub const FORMULA_ANCHOR: (f64, f64) = (0.5, 0.05);

/// Data-space limits of the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLogFrame {
    /// x value at the left edge (the larger one).
    pub x_left: f64,
    /// x value at the right edge (the smaller one).
    pub x_right: f64,
    pub y_low: f64,
    pub y_high: f64,
}

/// One grid line in chart space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub at: f64,
    /// Decade lines are major; 2..9 multiples are minor.
    pub major: bool,
}

impl LogLogFrame {
    /// Frame for the observed points and the fitted curve.
    ///
    /// x limits are `[max(x) * 5, min(x) / 5]`; y limits are whole decades
    /// enclosing the observed values and every positive, finite fitted value.
    /// Observed values must be positive.
    pub fn from_data(series: &EpochSeries, curve: &FitCurve) -> Option<Self> {
        let (x_min, x_max) = series.x_extent()?;

        let (obs_min, obs_max) = series.y_extent()?;
        let fitted: Vec<f64> = curve
            .y
            .iter()
            .copied()
            .filter(|v| v.is_finite() && *v > 0.0)
            .collect();
        let (y_min, y_max) = match extent(&fitted) {
            Some((lo, hi)) => (obs_min.min(lo), obs_max.max(hi)),
            None => (obs_min, obs_max),
        };
        if !(y_min > 0.0 && y_max.is_finite()) {
            return None;
        }

        let mut lo = y_min.log10().floor();
        let mut hi = y_max.log10().ceil();
        if hi <= lo {
            lo -= 1.0;
            hi += 1.0;
        }

        Some(Self {
            x_left: x_max * AXIS_PADDING,
            x_right: x_min / AXIS_PADDING,
            y_low: 10f64.powf(lo),
            y_high: 10f64.powf(hi),
        })
    }

    /// Map a data point into chart space.
    pub fn to_chart(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (-x.log10(), y.log10())
    }

    pub fn x_range(&self) -> Range<f64> {
        -self.x_left.log10()..-self.x_right.log10()
    }

    pub fn y_range(&self) -> Range<f64> {
        self.y_low.log10()..self.y_high.log10()
    }

    /// Chart-space point at the given axes fractions.
    pub fn axes_fraction(&self, (fx, fy): (f64, f64)) -> (f64, f64) {
        let xr = self.x_range();
        let yr = self.y_range();
        (
            xr.start + fx * (xr.end - xr.start),
            yr.start + fy * (yr.end - yr.start),
        )
    }

    /// Vertical grid lines (chart space), major and minor.
    pub fn x_grid(&self) -> Vec<GridLine> {
        log_grid(self.x_right.log10(), self.x_left.log10())
            .into_iter()
            .map(|g| GridLine { at: -g.at, major: g.major })
            .collect()
    }

    /// Horizontal grid lines (chart space), major and minor.
    pub fn y_grid(&self) -> Vec<GridLine> {
        log_grid(self.y_low.log10(), self.y_high.log10())
    }
}

/// Grid positions in `log10` units within `[lo, hi]`: one major line per
/// decade and minor lines at 2..9 times each decade.
pub fn log_grid(lo: f64, hi: f64) -> Vec<GridLine> {
    let mut out = Vec::new();
    if !(lo.is_finite() && hi.is_finite()) || hi < lo {
        return out;
    }

    let first = lo.floor() as i32;
    let last = hi.ceil() as i32;
    for k in first..=last {
        for m in 1..=9 {
            let at = f64::from(k) + f64::from(m).log10();
            if at >= lo - 1e-9 && at <= hi + 1e-9 {
                out.push(GridLine { at, major: m == 1 });
            }
        }
    }
    out
}

/// Label for a `log10` tick position: the plain decimal value on whole
/// decades, empty elsewhere.
pub fn format_decade(log_value: f64) -> String {
    let k = log_value.round();
    if (log_value - k).abs() > 1e-6 {
        return String::new();
    }
    let value = 10f64.powf(k);
    if k >= 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.prec$}", prec = (-k) as usize)
    }
}

/// Tick label for the x-axis in chart space (`u = -log10(x)`).
pub fn format_x_tick(u: f64) -> String {
    format_decade(-u)
}

/// Tick label for the y-axis in chart space (`v = log10(y)`).
pub fn format_y_tick(v: f64) -> String {
    format_decade(v)
}

/// Annotation offset in points for the record at `index`.
///
/// Alternating above/below is a static heuristic; there is no collision
/// detection.
pub fn annotation_offset_pt(index: usize) -> (f64, f64) {
    if index % 2 == 0 { EVEN_OFFSET_PT } else { ODD_OFFSET_PT }
}

/// Convert a point offset (y up) to a pixel offset (y down).
pub fn offset_to_pixels((dx, dy): (f64, f64), px_per_pt: f64) -> (i32, i32) {
    ((dx * px_per_pt).round() as i32, -(dy * px_per_pt).round() as i32)
}
