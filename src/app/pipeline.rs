//! Shared analysis pipeline used by the PNG renderer, the JSON report and the
//! terminal viewer.
//!
//! dataset -> parallel series -> log-log fit -> overlay curve
//!
//! Rendering front-ends then only deal with presentation.

use tracing::info;

use crate::data::EpochSeries;
use crate::domain::{CURVE_SAMPLES, EpochRecord, FitCurve, LogLogFit};
use crate::error::AppError;
use crate::fit::{fit_log_log, sample_curve};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub records: Vec<EpochRecord>,
    pub series: EpochSeries,
    pub fit: LogLogFit,
    pub curve: FitCurve,
}

/// Execute the analysis over `records` and return the computed outputs.
pub fn run_analysis(records: &[EpochRecord]) -> Result<AnalysisOutput, AppError> {
    let series = EpochSeries::from_records(records);
    let fit = fit_log_log(&series.x, &series.y)?;
    let curve = sample_curve(&series.x, &fit, CURVE_SAMPLES)?;

    info!(
        epochs = records.len(),
        slope = fit.slope,
        r_squared = fit.r_squared(),
        k = fit.constant_k(),
        "fitted power law"
    );

    Ok(AnalysisOutput {
        records: records.to_vec(),
        series,
        fit,
        curve,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::EPOCHS;

    #[test]
    fn pipeline_runs_over_embedded_dataset() {
        let out = run_analysis(&EPOCHS).unwrap();
        assert_eq!(out.records.len(), 6);
        assert_eq!(out.series.labels.len(), 6);
        assert_eq!(out.curve.len(), CURVE_SAMPLES);
        assert!(out.fit.r_squared() > 0.95);
    }

    #[test]
    fn pipeline_is_deterministic() {
        let a = run_analysis(&EPOCHS).unwrap();
        let b = run_analysis(&EPOCHS).unwrap();
        assert_eq!(a.fit, b.fit);
        assert_eq!(a.curve, b.curve);
    }

    #[test]
    fn pipeline_rejects_single_record() {
        let err = run_analysis(&EPOCHS[..1]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
