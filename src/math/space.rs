//! Geometric (log-uniform) sample grids.

use crate::error::AppError;

/// Generate `steps` geometrically spaced points between `min` and `max` (inclusive).
///
/// Points are uniform in `log10`. The endpoints are returned exactly as given
/// rather than round-tripped through `10^log10(v)`.
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0 && max > min) {
        return Err(AppError::usage(format!(
            "Invalid geometric range: min={min}, max={max} (must be finite, >0, and max>min)."
        )));
    }
    if steps < 2 {
        return Err(AppError::usage("Geometric grid needs at least 2 steps."));
    }

    let lo = min.log10();
    let hi = max.log10();
    let step = (hi - lo) / (steps as f64 - 1.0);

    let mut out: Vec<f64> = (0..steps)
        .map(|i| 10f64.powf(lo + step * i as f64))
        .collect();
    out[0] = min;
    out[steps - 1] = max;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_space_hits_endpoints_and_decades() {
        let v = log_space(0.01, 100.0, 5).unwrap();
        assert_eq!(v.len(), 5);
        assert_eq!(v[0], 0.01);
        assert_eq!(v[4], 100.0);
        for (got, want) in v.iter().zip([0.01, 0.1, 1.0, 10.0, 100.0]) {
            assert!((got / want - 1.0).abs() < 1e-12, "got {got}, want {want}");
        }
    }

    #[test]
    fn log_space_has_constant_ratio() {
        let v = log_space(0.0005, 10_000.0, 100).unwrap();
        let ratio = v[1] / v[0];
        for w in v.windows(2) {
            assert!(w[1] > w[0]);
            assert!((w[1] / w[0] / ratio - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn log_space_rejects_bad_ranges() {
        assert!(log_space(0.0, 1.0, 10).is_err());
        assert!(log_space(2.0, 1.0, 10).is_err());
        assert!(log_space(1.0, f64::INFINITY, 10).is_err());
        assert_eq!(log_space(1.0, 2.0, 1).unwrap_err().exit_code(), 2);
    }
}
