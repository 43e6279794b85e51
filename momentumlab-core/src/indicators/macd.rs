//! Moving Average Convergence Divergence (MACD).
//!
//! MACD      = EMA(close, fast) - EMA(close, slow)
//! Signal    = EMA(MACD, signal)
//! Histogram = MACD - Signal

use serde::{Deserialize, Serialize};

use super::ema::ema_of_series;
use super::Indicator;

/// MACD values for a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast >= 1, "MACD fast span must be >= 1");
        assert!(slow >= 1, "MACD slow span must be >= 1");
        assert!(signal >= 1, "MACD signal span must be >= 1");
        Self {
            fast,
            slow,
            signal,
            name: format!("macd_{fast}_{slow}_{signal}"),
        }
    }
}

impl Indicator for Macd {
    type Output = MacdPoint;

    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, values: &[f64]) -> Vec<MacdPoint> {
        let fast = ema_of_series(values, self.fast);
        let slow = ema_of_series(values, self.slow);
        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_of_series(&line, self.signal);

        line.iter()
            .zip(&signal)
            .map(|(&macd, &signal)| MacdPoint {
                macd,
                signal,
                histogram: macd - signal,
            })
            .collect()
    }
}
