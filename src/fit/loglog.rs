//! Log-log regression and the fitted-curve sampler.
//!
//! A power law `y = k * x^m` is a straight line in log space:
//!
//! ```text
//! log10(y) = log10(k) + m * log10(x)
//! ```
//!
//! so we transform both axes with `log10` and run simple OLS. The intercept is
//! `log10(k)`; the chart framing reads a slope near `-1` as `x * y = k`.

use nalgebra::DVector;
use tracing::debug;

use crate::domain::{CURVE_EXTENSION, FitCurve, LogLogFit};
use crate::error::AppError;
use crate::math::{log_space, simple_linear_regression};

/// Fit `log10(y)` on `log10(x)`.
///
/// Inputs are expected to be strictly positive; non-positive values are not
/// rejected and turn into NaN/-inf through the logarithm.
pub fn fit_log_log(x: &[f64], y: &[f64]) -> Result<LogLogFit, AppError> {
    let log_x = DVector::from_iterator(x.len(), x.iter().map(|v| v.log10()));
    let log_y = DVector::from_iterator(y.len(), y.iter().map(|v| v.log10()));

    let line = simple_linear_regression(&log_x, &log_y)?;
    debug!(
        n = line.n,
        slope = line.slope,
        intercept = line.intercept,
        r = line.r,
        p_value = line.p_value,
        "log-log regression"
    );

    Ok(LogLogFit {
        slope: line.slope,
        intercept: line.intercept,
        r_value: line.r,
        p_value: line.p_value,
        std_err: line.slope_stderr,
        intercept_stderr: line.intercept_stderr,
        n: line.n,
    })
}

/// Sample the fitted power law on `samples` geometric steps from
/// `min(x) / CURVE_EXTENSION` to `max(x) * CURVE_EXTENSION`.
pub fn sample_curve(x: &[f64], fit: &LogLogFit, samples: usize) -> Result<FitCurve, AppError> {
    let min = x.iter().copied().fold(f64::INFINITY, f64::min);
    let max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let x_fit = log_space(min / CURVE_EXTENSION, max * CURVE_EXTENSION, samples)?;
    let y_fit = x_fit.iter().map(|&v| fit.predict(v)).collect();

    Ok(FitCurve { x: x_fit, y: y_fit })
}
