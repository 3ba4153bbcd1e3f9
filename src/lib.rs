//! `thermo-money` library crate.
//!
//! Fits a power law `G = 10^b · E^m` to six historical monetary epochs in
//! log-log space and draws the result as an annotated chart. The binary is a
//! thin wrapper around this library so the fit, the geometry and the
//! rendering are testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod render;
pub mod report;
pub mod viewer;
