//! Exponential Moving Average (EMA).
//!
//! Recursive, non-adjusted form:
//! EMA[0] = x[0]
//! EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (span + 1)
//! No seed window, no bias correction, no warmup.
//!
//! Evaluated as EMA[t-1] + alpha * (x[t] - EMA[t-1]) so that a constant input
//! reproduces itself exactly (MACD of a flat series is exactly zero).

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("ema_{span}"),
        }
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        ema_of_series(values, self.span)
    }
}

/// Compute EMA values over an arbitrary series.
///
/// Used directly by MACD, which needs the EMA of its own line.
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    let Some(&first) = values.first() else {
        return result;
    };

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev = first;
    result.push(first);

    for &v in &values[1..] {
        let ema = prev + alpha * (v - prev);
        result.push(ema);
        prev = ema;
    }

    result
}
