//! Strategy parameters and their validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classifier::{ClassifierMode, RsiThresholds};
use crate::indicators::IndicatorWindows;

/// Rejected parameter sets. Raised before any computation starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("invalid configuration: {name} must be a positive integer (got {value})")]
    InvalidWindow { name: &'static str, value: usize },

    #[error(
        "invalid configuration: RSI thresholds must satisfy 0 <= oversold < overbought <= 100 \
         (got oversold={oversold}, overbought={overbought})"
    )]
    InvalidThresholds { oversold: f64, overbought: f64 },
}

/// Complete parameter set for one classification.
///
/// Every field has a default; an empty config table yields the classic
/// 12/26/9 MACD, 14-bar RSI, 50/200 MA, 30/70 thresholds, override mode.
///
/// Window keys sit flat next to `mode`. Deserialization goes through
/// [`FlatParams`] because serde cannot combine `flatten` with
/// `deny_unknown_fields`; a misspelled key is an error, not a default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "FlatParams")]
pub struct StrategyParams {
    pub mode: ClassifierMode,
    #[serde(flatten)]
    pub windows: IndicatorWindows,
    pub thresholds: RsiThresholds,
}

/// Wire shape of [`StrategyParams`].
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FlatParams {
    mode: ClassifierMode,
    fast_window: usize,
    slow_window: usize,
    signal_window: usize,
    rsi_window: usize,
    short_ma_window: usize,
    long_ma_window: usize,
    thresholds: RsiThresholds,
}

impl Default for FlatParams {
    fn default() -> Self {
        let params = StrategyParams::default();
        let w = params.windows;
        Self {
            mode: params.mode,
            fast_window: w.fast_window,
            slow_window: w.slow_window,
            signal_window: w.signal_window,
            rsi_window: w.rsi_window,
            short_ma_window: w.short_ma_window,
            long_ma_window: w.long_ma_window,
            thresholds: params.thresholds,
        }
    }
}

impl From<FlatParams> for StrategyParams {
    fn from(flat: FlatParams) -> Self {
        Self {
            mode: flat.mode,
            windows: IndicatorWindows {
                fast_window: flat.fast_window,
                slow_window: flat.slow_window,
                signal_window: flat.signal_window,
                rsi_window: flat.rsi_window,
                short_ma_window: flat.short_ma_window,
                long_ma_window: flat.long_ma_window,
            },
            thresholds: flat.thresholds,
        }
    }
}

impl StrategyParams {
    pub fn with_mode(mut self, mode: ClassifierMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_windows(mut self, windows: IndicatorWindows) -> Self {
        self.windows = windows;
        self
    }

    pub fn with_thresholds(mut self, thresholds: RsiThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Check every window is positive and the RSI thresholds are ordered.
    ///
    /// Windows are reported in declaration order; the first offender wins.
    pub fn validate(&self) -> Result<(), ParamError> {
        if let Some((name, value)) = self.windows.named().into_iter().find(|(_, v)| *v == 0) {
            return Err(ParamError::InvalidWindow { name, value });
        }
        if !self.thresholds.is_valid() {
            return Err(ParamError::InvalidThresholds {
                oversold: self.thresholds.oversold,
                overbought: self.thresholds.overbought,
            });
        }
        Ok(())
    }
}
