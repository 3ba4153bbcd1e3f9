//! JSON fit report.
//!
//! The report is the portable record of a run:
//! - the embedded dataset
//! - regression outputs (slope, intercept, r, p, standard errors, `k`)
//! - the sampled overlay curve
//! - the chart geometry that was written

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::app::pipeline::AnalysisOutput;
use crate::domain::{ChartConfig, EpochRecord, FitCurve, LogLogFit};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct FitReport<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    pub generated: DateTime<Utc>,
    pub epochs: &'a [EpochRecord],
    pub fit: &'a LogLogFit,
    pub r_squared: f64,
    /// Constant of the implied law `y = k * x^slope`.
    pub k: f64,
    pub curve: &'a FitCurve,
    pub chart: ChartMeta,
}

#[derive(Debug, Serialize)]
pub struct ChartMeta {
    pub output: String,
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: u32,
}

impl<'a> FitReport<'a> {
    pub fn new(output: &'a AnalysisOutput, config: &ChartConfig, generated: DateTime<Utc>) -> Self {
        let (width_px, height_px) = config.pixel_size();
        Self {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            generated,
            epochs: &output.records,
            fit: &output.fit,
            r_squared: output.fit.r_squared(),
            k: output.fit.constant_k(),
            curve: &output.curve,
            chart: ChartMeta {
                output: config.output.display().to_string(),
                width_px,
                height_px,
                dpi: config.dpi,
            },
        }
    }
}

/// Write the JSON fit report.
pub fn write_fit_report(path: &Path, output: &AnalysisOutput, config: &ChartConfig) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create fit report '{}': {e}", path.display())))?;

    let report = FitReport::new(output, config, Utc::now());
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report)
        .map_err(|e| AppError::usage(format!("Failed to write fit report: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::usage(format!("Failed to write fit report '{}': {e}", path.display())))?;

    info!(path = %path.display(), "wrote fit report");
    Ok(())
}
