//! Shared domain types.
//!
//! These are kept small and serializable so the same values can be:
//!
//! - printed to the terminal
//! - drawn into the PNG and the terminal viewer
//! - exported to the JSON fit report

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Default chart filename, written into the working directory.
pub const DEFAULT_OUTPUT: &str = "thermodynamic_money_law.png";

/// Number of samples on the fitted overlay curve.
pub const CURVE_SAMPLES: usize = 100;

/// The overlay curve extends this factor beyond the observed x range on each side.
pub const CURVE_EXTENSION: f64 = 2.0;

/// The x-axis limits extend this factor beyond the observed x range on each side.
pub const AXIS_PADDING: f64 = 5.0;

/// Typographic points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// One historical row: a monetary/energy regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpochRecord {
    /// Short era name ("Neolithic", "Rome", ...).
    pub epoch: &'static str,
    /// Smallest trusted monetary unit of the era.
    pub description: &'static str,
    /// Astronomical year; negative is BCE.
    pub year: i32,
    /// Energy cost `E`: labor-hours to purchase one gigajoule of useful energy.
    pub x: f64,
    /// Granularity `G`: 2024-USD purchasing power of the smallest trusted unit.
    pub y: f64,
}

impl EpochRecord {
    /// Two-line display label used for chart annotations.
    pub fn label(&self) -> String {
        format!("{}\n({})", self.epoch, self.description)
    }
}

/// Ordinary least squares fit of `log10(y)` on `log10(x)`.
///
/// The implied un-logged model is `y = 10^intercept * x^slope`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogLogFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation of the log-transformed points.
    pub r_value: f64,
    /// Two-sided p-value for the null hypothesis `slope == 0`.
    pub p_value: f64,
    /// Standard error of the slope.
    pub std_err: f64,
    /// Standard error of the intercept.
    pub intercept_stderr: f64,
    pub n: usize,
}

impl LogLogFit {
    pub fn r_squared(&self) -> f64 {
        self.r_value * self.r_value
    }

    /// Constant `k = 10^intercept` of the implied power law.
    pub fn constant_k(&self) -> f64 {
        10f64.powf(self.intercept)
    }

    /// Evaluate the fitted power law at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        10f64.powf(self.intercept + self.slope * x.log10())
    }
}

/// Fitted curve samples for plotting beyond the observed range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl FitCurve {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + Clone + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Chart rendering configuration.
///
/// This is derived from CLI flags (plus defaults). The defaults reproduce the
/// canonical chart: 12x8 inches at 300 dpi written to [`DEFAULT_OUTPUT`].
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub output: PathBuf,
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
    /// Explicit font file for chart text; system fonts are searched otherwise.
    pub font: Option<PathBuf>,
    /// Open the terminal viewer after saving.
    pub show: bool,
    pub export_json: Option<PathBuf>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            width_in: 12.0,
            height_in: 8.0,
            dpi: 300,
            font: None,
            show: true,
            export_json: None,
        }
    }
}

impl ChartConfig {
    /// Canvas size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        (
            (self.width_in * dpi).round() as u32,
            (self.height_in * dpi).round() as u32,
        )
    }

    /// Convert a length in typographic points to pixels at the configured dpi.
    pub fn points_to_px(&self, points: f64) -> f64 {
        points * f64::from(self.dpi) / POINTS_PER_INCH
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_twelve_by_eight_at_300_dpi() {
        let config = ChartConfig::default();
        assert_eq!(config.pixel_size(), (3600, 2400));
        assert_eq!(config.output(), Path::new(DEFAULT_OUTPUT));
        assert!((config.points_to_px(72.0) - 300.0).abs() < 1e-12);
    }

    #[test]
    fn fit_predict_matches_power_law() {
        let fit = LogLogFit {
            slope: -1.0,
            intercept: 2.0,
            r_value: -1.0,
            p_value: 0.0,
            std_err: 0.0,
            intercept_stderr: 0.0,
            n: 3,
        };
        assert!((fit.constant_k() - 100.0).abs() < 1e-9);
        assert!((fit.predict(4.0) - 25.0).abs() < 1e-9);
        assert!((fit.r_squared() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn label_is_two_lines() {
        let record = EpochRecord {
            epoch: "Rome",
            description: "Bronze Nummus",
            year: 300,
            x: 50.0,
            y: 2.0,
        };
        assert_eq!(record.label(), "Rome\n(Bronze Nummus)");
    }
}
