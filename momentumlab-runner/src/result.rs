//! Classification result artifact.

use serde::{Deserialize, Serialize};

use momentumlab_core::{
    DatasetHash, IndicatorFrame, ParamsHash, Signal, SignalCounts, SignalSeries, StrategyOutput,
    StrategyParams,
};

use crate::loader::LoadedSeries;

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of classifying one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub symbol: String,
    pub bar_count: usize,
    /// Label at the last bar; `None` for an empty series.
    pub current_signal: Option<Signal>,
    pub counts: SignalCounts,
    /// Indices where the label differs from the previous bar.
    pub transitions: Vec<usize>,
    pub signals: SignalSeries,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorFrame>,
    pub params: StrategyParams,
    pub params_hash: ParamsHash,
    pub dataset_hash: DatasetHash,
    pub synthetic: bool,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl ClassificationResult {
    /// Assemble the artifact from an engine output.
    pub fn from_output(
        series: &LoadedSeries,
        params: &StrategyParams,
        output: StrategyOutput,
        include_indicators: bool,
    ) -> Self {
        let StrategyOutput { frame, signals } = output;
        Self {
            schema_version: SCHEMA_VERSION,
            symbol: series.symbol.clone(),
            bar_count: signals.len(),
            current_signal: signals.current(),
            counts: signals.counts(),
            transitions: signals.transitions(),
            indicators: include_indicators.then_some(frame),
            signals,
            params: *params,
            params_hash: params.params_hash(),
            dataset_hash: series.dataset_hash(),
            synthetic: series.synthetic,
        }
    }
}
