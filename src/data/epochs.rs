//! The thermodynamic money dataset.
//!
//! - `x` (energy cost `E`): hours of human labor required to purchase one
//!   gigajoule of useful energy, from price-of-light and historical wage data.
//! - `y` (granularity `G`): purchasing power of the smallest socially trusted
//!   accounting unit, in 2024 USD, from numismatic data.
//!
//! Rows are chronological and every `x`/`y` is strictly positive. Neither is
//! checked at runtime: the table is the contract.

use crate::domain::EpochRecord;

pub const EPOCHS: [EpochRecord; 6] = [
    // Hunting/gathering; the unit is a relationship (high value, low velocity).
    EpochRecord {
        epoch: "Neolithic",
        description: "Social Credit",
        year: -10000,
        x: 5000.0,
        y: 500.0,
    },
    // Oxen/agriculture; one grain of barley.
    EpochRecord {
        epoch: "Sumer",
        description: "Barley/Shekel",
        year: -2000,
        x: 400.0,
        y: 13.0,
    },
    // Slavery/watermills.
    EpochRecord {
        epoch: "Rome",
        description: "Bronze Nummus",
        year: 300,
        x: 50.0,
        y: 2.0,
    },
    // Wind/animal.
    EpochRecord {
        epoch: "Medieval",
        description: "Silver Farthing",
        year: 1400,
        x: 40.0,
        y: 1.5,
    },
    // Coal/steam.
    EpochRecord {
        epoch: "Industrial",
        description: "Copper Penny",
        year: 1900,
        x: 5.0,
        y: 0.05,
    },
    // Solar/nuclear/grid; a database entry or a satoshi.
    EpochRecord {
        epoch: "Digital",
        description: "Satoshi/Byte",
        year: 2024,
        x: 0.001,
        y: 0.00001,
    },
];

/// Parallel numeric sequences and display labels, one entry per record.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub labels: Vec<String>,
}

impl EpochSeries {
    pub fn from_records(records: &[EpochRecord]) -> Self {
        Self {
            x: records.iter().map(|r| r.x).collect(),
            y: records.iter().map(|r| r.y).collect(),
            labels: records.iter().map(EpochRecord::label).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// `(min, max)` of the x values, or `None` when empty.
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        extent(&self.x)
    }

    /// `(min, max)` of the y values, or `None` when empty.
    pub fn y_extent(&self) -> Option<(f64, f64)> {
        extent(&self.y)
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

pub(crate) fn extent(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_is_six_chronological_positive_rows() {
        assert_eq!(EPOCHS.len(), 6);
        assert!(EPOCHS.windows(2).all(|w| w[0].year < w[1].year));
        assert!(EPOCHS.iter().all(|r| r.x > 0.0 && r.y > 0.0));
        assert_eq!(EPOCHS[0].epoch, "Neolithic");
        assert_eq!((EPOCHS[0].x, EPOCHS[0].y), (5000.0, 500.0));
        assert_eq!(EPOCHS[5].epoch, "Digital");
        assert_eq!((EPOCHS[5].x, EPOCHS[5].y), (0.001, 0.00001));
    }

    #[test]
    fn series_preserves_record_order() {
        let series = EpochSeries::from_records(&EPOCHS);
        assert_eq!(series.len(), 6);
        assert_eq!(series.x, vec![5000.0, 400.0, 50.0, 40.0, 5.0, 0.001]);
        assert_eq!(series.y, vec![500.0, 13.0, 2.0, 1.5, 0.05, 0.00001]);
        assert_eq!(series.labels[1], "Sumer\n(Barley/Shekel)");
        assert_eq!(series.labels[5], "Digital\n(Satoshi/Byte)");
    }

    #[test]
    fn extents_cover_all_rows() {
        let series = EpochSeries::from_records(&EPOCHS);
        assert_eq!(series.x_extent(), Some((0.001, 5000.0)));
        assert_eq!(series.y_extent(), Some((0.00001, 500.0)));
        assert_eq!(EpochSeries::from_records(&[]).x_extent(), None);
    }
}
