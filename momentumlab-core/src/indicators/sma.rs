//! Simple Moving Average (SMA).
//!
//! Rolling arithmetic mean with a minimum of one observation: until `period`
//! values are available, index t averages over all t+1 values seen so far.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        rolling_mean(values, self.period)
    }
}

/// Rolling mean over `window` values, shrinking the window at the start of the
/// series instead of producing undefined values.
///
/// Each window is summed left to right from scratch so the result does not
/// accumulate add/remove rounding drift over long series.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            let sum: f64 = slice.iter().sum();
            sum / slice.len() as f64
        })
        .collect()
}
