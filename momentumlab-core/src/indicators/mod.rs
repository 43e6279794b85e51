//! Indicator implementations.
//!
//! Indicators are pure functions: a numeric series in, a series of the same
//! length out. They are computed once per classification into an
//! [`IndicatorFrame`] and never recomputed per bar.
//!
//! Unlike warmup-style indicators, every indicator here produces a value from
//! the first bar on: EMAs start from the first input, rolling means average
//! over whatever history is available until the window fills. The one
//! undefined value is RSI on a flat window (0/0), which is `None`.

pub mod ema;
pub mod frame;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::{ema_of_series, Ema};
pub use frame::{IndicatorEngine, IndicatorFrame, IndicatorRow, IndicatorWindows};
pub use macd::{Macd, MacdPoint};
pub use rsi::Rsi;
pub use sma::{rolling_mean, Sma};

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No output value at index t may depend on input from index t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Per-index output type (`f64` for most, `Option<f64>` where a value can
    /// be undefined).
    type Output;

    /// Human-readable name (e.g., "ema_12", "rsi_14").
    fn name(&self) -> &str;

    /// Compute the indicator over the whole input.
    ///
    /// Returns a `Vec` of the same length as `values`.
    fn compute(&self, values: &[f64]) -> Vec<Self::Output>;
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
