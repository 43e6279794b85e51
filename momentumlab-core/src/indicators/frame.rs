//! Indicator frame — every indicator the classifier reads, one row per bar.
//!
//! The frame is built once per classification and is immutable afterwards.
//! Rules look values up by bar index; they never recompute indicators.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{closes, PricePoint};

use super::{Indicator, Macd, Rsi, Sma};

/// Window lengths for every indicator in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorWindows {
    pub fast_window: usize,
    pub slow_window: usize,
    pub signal_window: usize,
    pub rsi_window: usize,
    pub short_ma_window: usize,
    pub long_ma_window: usize,
}

impl Default for IndicatorWindows {
    fn default() -> Self {
        Self {
            fast_window: 12,
            slow_window: 26,
            signal_window: 9,
            rsi_window: 14,
            short_ma_window: 50,
            long_ma_window: 200,
        }
    }
}

impl IndicatorWindows {
    /// Every window paired with its configuration key, in declaration order.
    pub fn named(&self) -> [(&'static str, usize); 6] {
        [
            ("fast_window", self.fast_window),
            ("slow_window", self.slow_window),
            ("signal_window", self.signal_window),
            ("rsi_window", self.rsi_window),
            ("short_ma_window", self.short_ma_window),
            ("long_ma_window", self.long_ma_window),
        ]
    }
}

/// Indicator values for a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
    /// `None` where the RSI window is flat (no gains, no losses).
    pub rsi: Option<f64>,
    pub short_ma: f64,
    pub long_ma: f64,
}

/// Per-bar indicator rows aligned 1:1 with the input series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorFrame {
    rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    /// Build a frame from precomputed rows.
    ///
    /// Used by tests and by callers that want to classify indicator values
    /// produced elsewhere.
    pub fn from_rows(rows: Vec<IndicatorRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&IndicatorRow> {
        self.rows.get(index)
    }

    /// The row at `index` and the row before it. `None` at index 0.
    pub fn with_previous(&self, index: usize) -> Option<(&IndicatorRow, &IndicatorRow)> {
        let prev = self.rows.get(index.checked_sub(1)?)?;
        let current = self.rows.get(index)?;
        Some((prev, current))
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn last(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }
}

/// Computes an [`IndicatorFrame`] from a price series.
///
/// Holds only the configured indicators; it keeps no state between calls.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    macd: Macd,
    rsi: Rsi,
    short_ma: Sma,
    long_ma: Sma,
}

impl IndicatorEngine {
    /// # Panics
    /// If any window is zero. Validate windows first (see
    /// `StrategyParams::validate`).
    pub fn new(windows: &IndicatorWindows) -> Self {
        Self {
            macd: Macd::new(
                windows.fast_window,
                windows.slow_window,
                windows.signal_window,
            ),
            rsi: Rsi::new(windows.rsi_window),
            short_ma: Sma::new(windows.short_ma_window),
            long_ma: Sma::new(windows.long_ma_window),
        }
    }

    /// Names of the computed indicators, for logging and reports.
    pub fn indicator_names(&self) -> [&str; 4] {
        [
            self.macd.name(),
            self.rsi.name(),
            self.short_ma.name(),
            self.long_ma.name(),
        ]
    }

    pub fn compute(&self, series: &[PricePoint]) -> IndicatorFrame {
        let values = closes(series);
        let macd = self.macd.compute(&values);
        let rsi = self.rsi.compute(&values);
        let short_ma = self.short_ma.compute(&values);
        let long_ma = self.long_ma.compute(&values);

        let rows = series
            .iter()
            .enumerate()
            .map(|(i, point)| IndicatorRow {
                timestamp: point.timestamp,
                close: point.close,
                macd: macd[i].macd,
                macd_signal: macd[i].signal,
                macd_histogram: macd[i].histogram,
                rsi: rsi[i],
                short_ma: short_ma[i],
                long_ma: long_ma[i],
            })
            .collect();

        IndicatorFrame { rows }
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(&IndicatorWindows::default())
    }
}
