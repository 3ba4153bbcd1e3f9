//! Simple (one-regressor) ordinary least squares.
//!
//! ```text
//! minimize Σ (y_i - (b + m x_i))^2
//! ```
//!
//! Implementation choices:
//! - The closed form through centered second moments is used instead of a
//!   matrix solve. A constant `x` then yields `0 / 0 = NaN` for the slope,
//!   which propagates to every caller untouched.
//! - Significance follows the usual t test on `r` with `n - 2` degrees of
//!   freedom. A tiny epsilon keeps a perfect fit (`|r| = 1`) finite.

use nalgebra::DVector;

use crate::error::AppError;
use crate::math::stats::student_t_two_sided_p;

/// Keeps `1 - r^2` away from exact zero in the t statistic.
const PERFECT_FIT_EPS: f64 = 1e-20;

/// Result of a simple linear regression `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    pub r: f64,
    pub p_value: f64,
    pub slope_stderr: f64,
    pub intercept_stderr: f64,
    pub n: usize,
}

/// Fit `y` on `x` by ordinary least squares.
///
/// Returns an error only for structural misuse (length mismatch or fewer than
/// two points). Numerically degenerate input is not rejected.
pub fn simple_linear_regression(x: &DVector<f64>, y: &DVector<f64>) -> Result<LineFit, AppError> {
    let n = x.len();
    if n != y.len() {
        return Err(AppError::usage(format!(
            "Regression inputs differ in length: x has {n}, y has {}.",
            y.len()
        )));
    }
    if n < 2 {
        return Err(AppError::usage(format!(
            "Regression needs at least 2 points, got {n}."
        )));
    }

    let nf = n as f64;
    let x_mean = x.mean();
    let y_mean = y.mean();
    let dx = x.add_scalar(-x_mean);
    let dy = y.add_scalar(-y_mean);

    let ssxm = dx.dot(&dx) / nf;
    let ssym = dy.dot(&dy) / nf;
    let ssxym = dx.dot(&dy) / nf;

    let r = if ssxm != 0.0 && ssym == 0.0 {
        0.0
    } else {
        (ssxym / (ssxm * ssym).sqrt()).clamp(-1.0, 1.0)
    };

    let slope = ssxym / ssxm;
    let intercept = y_mean - slope * x_mean;

    let (p_value, slope_stderr, intercept_stderr) = if n == 2 {
        // A line through two points: no residual degrees of freedom.
        let p = if y[0] == y[1] { 1.0 } else { 0.0 };
        (p, 0.0, 0.0)
    } else {
        let df = nf - 2.0;
        let t = r * (df / ((1.0 - r + PERFECT_FIT_EPS) * (1.0 + r + PERFECT_FIT_EPS))).sqrt();
        let p = student_t_two_sided_p(t, df);
        let slope_stderr = ((1.0 - r * r) * ssym / ssxm / df).sqrt();
        let intercept_stderr = slope_stderr * (ssxm + x_mean * x_mean).sqrt();
        (p, slope_stderr, intercept_stderr)
    };

    Ok(LineFit {
        slope,
        intercept,
        r,
        p_value,
        slope_stderr,
        intercept_stderr,
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_line_is_recovered() {
        // y = 2 + 3x on x = [0, 1, 2, 3]
        let x = DVector::from_row_slice(&[0.0, 1.0, 2.0, 3.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0, 11.0]);

        let fit = simple_linear_regression(&x, &y).unwrap();
        assert!((fit.slope - 3.0).abs() < 1e-12);
        assert!((fit.intercept - 2.0).abs() < 1e-12);
        assert!((fit.r - 1.0).abs() < 1e-12);
        assert!(fit.p_value < 1e-9);
        assert!(fit.slope_stderr.abs() < 1e-9);
    }

    #[test]
    fn noisy_line_statistics() {
        let x = DVector::from_row_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let y = DVector::from_row_slice(&[2.0, 4.0, 5.0, 4.0, 5.0]);

        let fit = simple_linear_regression(&x, &y).unwrap();
        assert!((fit.slope - 0.6).abs() < 1e-12);
        assert!((fit.intercept - 2.2).abs() < 1e-12);
        // r = 6 / sqrt(10 * 6)
        assert!((fit.r - 6.0 / 60f64.sqrt()).abs() < 1e-12);
        // stderr = sqrt(SSE / (n - 2) / Sxx) = sqrt(2.4 / 3 / 10)
        assert!((fit.slope_stderr - (0.08f64).sqrt()).abs() < 1e-12);
        assert!(fit.p_value > 0.05 && fit.p_value < 0.5);
    }

    #[test]
    fn two_points_have_no_residual_freedom() {
        let x = DVector::from_row_slice(&[1.0, 3.0]);
        let y = DVector::from_row_slice(&[1.0, 5.0]);
        let fit = simple_linear_regression(&x, &y).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert_eq!(fit.p_value, 0.0);
        assert_eq!(fit.slope_stderr, 0.0);

        let flat = DVector::from_row_slice(&[4.0, 4.0]);
        let fit = simple_linear_regression(&x, &flat).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.p_value, 1.0);
    }

    #[test]
    fn constant_x_propagates_nan() {
        let x = DVector::from_row_slice(&[2.0, 2.0, 2.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let fit = simple_linear_regression(&x, &y).unwrap();
        assert!(fit.slope.is_nan());
        assert!(fit.intercept.is_nan());
    }

    #[test]
    fn structural_misuse_is_rejected() {
        let x = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        assert_eq!(simple_linear_regression(&x, &y).unwrap_err().exit_code(), 2);

        let one = DVector::from_row_slice(&[1.0]);
        assert!(simple_linear_regression(&one, &one).is_err());
    }
}
