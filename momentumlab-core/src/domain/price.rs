//! PricePoint — the fundamental market data unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single close observation.
///
/// A price series is a slice of these, ordered by `timestamp` ascending with no
/// duplicates. Ordering is a caller precondition: nothing in this crate sorts,
/// deduplicates or rejects an out-of-order series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub close: f64,
}

impl PricePoint {
    pub fn new(timestamp: NaiveDateTime, close: f64) -> Self {
        Self { timestamp, close }
    }

    /// True if the close is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.close.is_finite() && self.close >= 0.0
    }
}

/// Extract the close column of a series.
pub fn closes(series: &[PricePoint]) -> Vec<f64> {
    series.iter().map(|p| p.close).collect()
}
