//! Signal labels and the per-bar signal series.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete trading action assigned to one bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label tallies over a signal series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalCounts {
    pub buy: usize,
    pub sell: usize,
    pub hold: usize,
}

/// One label per input bar, aligned index-for-index with the price series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalSeries(Vec<Signal>);

impl SignalSeries {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Signal> {
        self.0.get(index).copied()
    }

    /// The label of the most recent bar. This is what a caller displays as the
    /// "current signal".
    pub fn current(&self) -> Option<Signal> {
        self.0.last().copied()
    }

    pub fn as_slice(&self) -> &[Signal] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Signal> {
        self.0.iter()
    }

    pub fn counts(&self) -> SignalCounts {
        let mut counts = SignalCounts::default();
        for signal in &self.0 {
            match signal {
                Signal::Buy => counts.buy += 1,
                Signal::Sell => counts.sell += 1,
                Signal::Hold => counts.hold += 1,
            }
        }
        counts
    }

    /// Indices whose label differs from the previous bar's label.
    pub fn transitions(&self) -> Vec<usize> {
        self.0
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[0] != pair[1])
            .map(|(i, _)| i + 1)
            .collect()
    }
}

impl From<Vec<Signal>> for SignalSeries {
    fn from(labels: Vec<Signal>) -> Self {
        Self(labels)
    }
}

impl<'a> IntoIterator for &'a SignalSeries {
    type Item = &'a Signal;
    type IntoIter = std::slice::Iter<'a, Signal>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
