//! Power-law fitting.
//!
//! - `loglog`: OLS on `log10` of both axes, plus the overlay curve sampler

pub mod loglog;

pub use loglog::{fit_log_log, sample_curve};
