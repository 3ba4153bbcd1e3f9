//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the embedded dataset row (`EpochRecord`)
//! - regression outputs (`LogLogFit`, `FitCurve`)
//! - rendering configuration (`ChartConfig`)

pub mod types;

pub use types::*;
