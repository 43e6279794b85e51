//! MACD/RSI momentum divergence — single-step detection.
//!
//! Bullish: MACD rising while RSI falling, MACD above zero, RSI below overbought.
//! Bearish: MACD falling while RSI rising, MACD below zero, RSI above oversold.
//!
//! "Rising" and "falling" compare bar t with bar t-1 only. This is a momentum
//! heuristic, not peak/trough divergence over swing pivots.

use serde::{Deserialize, Serialize};

use crate::domain::Signal;
use crate::indicators::{IndicatorFrame, IndicatorRow};

use super::rule::RsiThresholds;

/// Direction of a detected divergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Divergence {
    Bullish,
    Bearish,
}

impl Divergence {
    pub fn signal(&self) -> Signal {
        match self {
            Divergence::Bullish => Signal::Buy,
            Divergence::Bearish => Signal::Sell,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DivergenceDetector {
    thresholds: RsiThresholds,
}

impl DivergenceDetector {
    pub fn new(thresholds: RsiThresholds) -> Self {
        Self { thresholds }
    }

    /// Detect divergence at `index`. Never fires at index 0.
    pub fn detect(&self, frame: &IndicatorFrame, index: usize) -> Option<Divergence> {
        let (prev, current) = frame.with_previous(index)?;
        self.detect_rows(prev, current)
    }

    /// Detect divergence between two consecutive rows.
    ///
    /// Both rows need a defined RSI; an undefined RSI makes every comparison
    /// false.
    pub fn detect_rows(&self, prev: &IndicatorRow, current: &IndicatorRow) -> Option<Divergence> {
        let rsi = current.rsi?;
        let prev_rsi = prev.rsi?;

        let macd_rising = current.macd > prev.macd;
        let macd_falling = current.macd < prev.macd;
        let rsi_rising = rsi > prev_rsi;
        let rsi_falling = rsi < prev_rsi;

        if macd_rising && rsi_falling && current.macd > 0.0 && rsi < self.thresholds.overbought {
            return Some(Divergence::Bullish);
        }
        if macd_falling && rsi_rising && current.macd < 0.0 && rsi > self.thresholds.oversold {
            return Some(Divergence::Bearish);
        }
        None
    }
}
