//! Formatted terminal output.
//!
//! Formatting lives here so the math and rendering code stay free of
//! presentation details, and output changes stay localized.

use std::path::Path;

use crate::domain::{EpochRecord, LogLogFit};

/// The three summary lines printed after fitting (no trailing newline).
pub fn format_fit_summary(fit: &LogLogFit) -> String {
    format!(
        "Thermodynamic Law Detected:\nSlope: {:.4} (Target is -1.0)\nR-Squared: {:.4} (Target is > 0.95)",
        fit.slope,
        fit.r_squared()
    )
}

/// Confirmation line after the chart has been written.
pub fn format_saved(path: &Path) -> String {
    format!("Graph saved as {}", path.display())
}

/// Legend label for the fitted curve, two lines.
pub fn format_fit_legend(fit: &LogLogFit) -> String {
    format!(
        "Thermodynamic Constraint\nSlope = {:.3} | R² = {:.3}",
        fit.slope,
        fit.r_squared()
    )
}

/// Signed year as a calendar label: `-10000` -> `10000 BC`, `300` -> `300 AD`.
pub fn format_year(year: i32) -> String {
    if year < 0 {
        format!("{} BC", -i64::from(year))
    } else {
        format!("{year} AD")
    }
}

/// Per-epoch table with the fitted value and the observed/fitted ratio.
pub fn format_epoch_table(records: &[EpochRecord], fit: &LogLogFit) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<12} {:>9} {:>10} {:>10} {:>10} {:>7}",
            "epoch", "year", "E (h/GJ)", "G ($)", "G fit", "G/fit"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<12} {:-<9} {:-<10} {:-<10} {:-<10} {:-<7}",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in records {
        let y_fit = fit.predict(r.x);
        out.push_str(
            format!(
                "{:<12} {:>9} {:>10} {:>10} {:>10} {:>7.2}",
                truncate(r.epoch, 12),
                format_year(r.year),
                fmt_sig(r.x),
                fmt_sig(r.y),
                fmt_sig(y_fit),
                r.y / y_fit,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn fmt_sig(v: f64) -> String {
    if v != 0.0 && (v.abs() < 0.01 || v.abs() >= 100_000.0) {
        format!("{v:.2e}")
    } else {
        format!("{v:.3}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
