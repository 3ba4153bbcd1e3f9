//! Embedded dataset and the parallel series derived from it.

pub mod epochs;

pub use epochs::{EPOCHS, EpochSeries};
