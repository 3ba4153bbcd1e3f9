//! Input/output helpers.
//!
//! - JSON fit report (`report`)

pub mod report;

pub use report::*;
