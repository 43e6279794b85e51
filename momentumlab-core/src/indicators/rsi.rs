//! Relative Strength Index (RSI).
//!
//! Simple (Cutler) averaging of gains and losses, not Wilder smoothing:
//! avg_gain / avg_loss are rolling means over `period` changes with a minimum
//! of one observation. The first bar has no previous close; it counts as a
//! zero gain and zero loss.
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Edge cases: avg_loss == 0 → RSI = 100; both zero (flat window) → `None`.

use super::sma::rolling_mean;
use super::Indicator;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    type Output = Option<f64>;

    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        let n = values.len();
        let mut gains = vec![0.0; n];
        let mut losses = vec![0.0; n];
        for i in 1..n {
            let change = values[i] - values[i - 1];
            gains[i] = change.max(0.0);
            losses[i] = (-change).max(0.0);
        }

        let avg_gains = rolling_mean(&gains, self.period);
        let avg_losses = rolling_mean(&losses, self.period);

        avg_gains
            .iter()
            .zip(&avg_losses)
            .map(|(&avg_gain, &avg_loss)| compute_rsi(avg_gain, avg_loss))
            .collect()
    }
}

/// RSI from average gain and loss. `None` when both are zero (0/0).
pub fn compute_rsi(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            None
        } else {
            Some(100.0)
        }
    } else {
        Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
    }
}
