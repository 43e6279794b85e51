//! StrategyEngine — the composition root.
//!
//! Wires validated params → IndicatorEngine → RuleSet. The engine keeps only
//! its configuration; every call builds a fresh frame and signal series, so
//! one engine can be shared across threads and reused across series.

use serde::Serialize;
use tracing::debug;

use crate::classifier::{RuleOutcome, RuleSet};
use crate::domain::{PricePoint, SignalSeries};
use crate::indicators::{IndicatorEngine, IndicatorFrame};

use super::params::{ParamError, StrategyParams};

/// Indicator frame and labels for one classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyOutput {
    pub frame: IndicatorFrame,
    pub signals: SignalSeries,
}

#[derive(Debug, Clone)]
pub struct StrategyEngine {
    params: StrategyParams,
    indicators: IndicatorEngine,
    rules: RuleSet,
}

impl StrategyEngine {
    /// Validate `params` and assemble the engine.
    pub fn new(params: StrategyParams) -> Result<Self, ParamError> {
        params.validate()?;
        Ok(Self {
            indicators: IndicatorEngine::new(&params.windows),
            rules: RuleSet::for_mode(params.mode, params.thresholds),
            params,
        })
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Compute indicators and labels.
    ///
    /// The series must be ordered by timestamp; that is not checked. An empty
    /// series yields an empty output.
    pub fn evaluate(&self, series: &[PricePoint]) -> StrategyOutput {
        let frame = self.indicators.compute(series);
        let signals = self.rules.classify(&frame);

        let counts = signals.counts();
        debug!(
            bars = series.len(),
            mode = %self.params.mode,
            buy = counts.buy,
            sell = counts.sell,
            hold = counts.hold,
            current = ?signals.current(),
            "classified price series"
        );

        StrategyOutput { frame, signals }
    }

    /// Labels only.
    pub fn classify(&self, series: &[PricePoint]) -> SignalSeries {
        self.evaluate(series).signals
    }

    /// Per-rule proposals at `index`, for explaining a label.
    pub fn explain(&self, frame: &IndicatorFrame, index: usize) -> Vec<RuleOutcome> {
        self.rules.explain(frame, index)
    }
}

/// One-shot classification: validate, compute, label.
pub fn classify(series: &[PricePoint], params: &StrategyParams) -> Result<SignalSeries, ParamError> {
    Ok(StrategyEngine::new(*params)?.classify(series))
}

/// One-shot classification that also returns the indicator frame.
pub fn evaluate(series: &[PricePoint], params: &StrategyParams) -> Result<StrategyOutput, ParamError> {
    Ok(StrategyEngine::new(*params)?.evaluate(series))
}
