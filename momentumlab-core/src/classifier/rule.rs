//! Classification rules — tagged variants, each a (predicate, label) pair.
//!
//! A rule looks at one bar of an [`IndicatorFrame`] and either proposes a
//! label or abstains. Rules never see the label assigned by other rules;
//! precedence is decided entirely by their position in a `RuleSet`.
//!
//! All comparisons are strict. A value sitting exactly on a boundary (MACD
//! equal to its signal line, RSI equal to a threshold) makes the rule abstain.

use serde::{Deserialize, Serialize};

use crate::domain::Signal;
use crate::indicators::{IndicatorFrame, IndicatorRow};

use super::divergence::DivergenceDetector;

/// RSI extremity bounds shared by the threshold, divergence and confluence rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RsiThresholds {
    /// RSI strictly below this is oversold.
    pub oversold: f64,
    /// RSI strictly above this is overbought.
    pub overbought: f64,
}

impl Default for RsiThresholds {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl RsiThresholds {
    /// True if `0 <= oversold < overbought <= 100`.
    pub fn is_valid(&self) -> bool {
        self.oversold >= 0.0 && self.overbought <= 100.0 && self.oversold < self.overbought
    }

    fn is_oversold(&self, rsi: Option<f64>) -> bool {
        rsi.is_some_and(|v| v < self.oversold)
    }

    fn is_overbought(&self, rsi: Option<f64>) -> bool {
        rsi.is_some_and(|v| v > self.overbought)
    }
}

/// A single classification rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    /// BUY where MACD is above its signal line, SELL where below.
    MacdCrossover,
    /// BUY where RSI is oversold, SELL where overbought. Abstains on undefined RSI.
    RsiThreshold(RsiThresholds),
    /// BUY on bullish divergence, SELL on bearish.
    Divergence(DivergenceDetector),
    /// BUY only when short MA > long MA, RSI oversold and MACD above signal
    /// all hold together; SELL only when all three opposites hold.
    MaConfluence(RsiThresholds),
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::MacdCrossover => "macd_crossover",
            Rule::RsiThreshold(_) => "rsi_threshold",
            Rule::Divergence(_) => "divergence",
            Rule::MaConfluence(_) => "ma_confluence",
        }
    }

    /// The label this rule proposes at `index`, or `None` if it abstains.
    pub fn evaluate(&self, frame: &IndicatorFrame, index: usize) -> Option<Signal> {
        match self {
            Rule::Divergence(detector) => detector.detect(frame, index).map(|d| d.signal()),
            _ => self.evaluate_row(frame.get(index)?),
        }
    }

    fn evaluate_row(&self, row: &IndicatorRow) -> Option<Signal> {
        match self {
            Rule::MacdCrossover => {
                if row.macd > row.macd_signal {
                    Some(Signal::Buy)
                } else if row.macd < row.macd_signal {
                    Some(Signal::Sell)
                } else {
                    None
                }
            }
            Rule::RsiThreshold(thresholds) => {
                if thresholds.is_oversold(row.rsi) {
                    Some(Signal::Buy)
                } else if thresholds.is_overbought(row.rsi) {
                    Some(Signal::Sell)
                } else {
                    None
                }
            }
            Rule::MaConfluence(thresholds) => {
                let uptrend = row.short_ma > row.long_ma;
                let downtrend = row.short_ma < row.long_ma;
                if uptrend && thresholds.is_oversold(row.rsi) && row.macd > row.macd_signal {
                    Some(Signal::Buy)
                } else if downtrend
                    && thresholds.is_overbought(row.rsi)
                    && row.macd < row.macd_signal
                {
                    Some(Signal::Sell)
                } else {
                    None
                }
            }
            // Needs two rows; handled in `evaluate`.
            Rule::Divergence(_) => None,
        }
    }
}
