//! Mathematical utilities: simple OLS, Student t tails, geometric grids.

pub mod ols;
pub mod space;
pub mod stats;

pub use ols::*;
pub use space::*;
pub use stats::*;
