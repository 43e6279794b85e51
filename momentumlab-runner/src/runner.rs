//! Classification runner: wires config, loading and the strategy engine.
//!
//! Two entry points:
//! - `run_single()`: loads a CSV file, then classifies. Used by the CLI.
//! - `Runner::classify()`: takes a pre-loaded series, no I/O. Used by batch
//!   runs and synthetic data.

use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use momentumlab_core::{ParamError, StrategyEngine, StrategyParams};

use crate::config::{ConfigError, OutputConfig, RunnerConfig};
use crate::export::ExportError;
use crate::loader::{load_csv, LoadError, LoadedSeries};
use crate::result::ClassificationResult;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error(transparent)]
    Params(#[from] ParamError),
    #[error("export error: {0}")]
    Export(#[from] ExportError),
}

/// A validated engine plus output options. Cheap to share across threads.
#[derive(Debug, Clone)]
pub struct Runner {
    engine: StrategyEngine,
    output: OutputConfig,
}

impl Runner {
    pub fn new(config: &RunnerConfig) -> Result<Self, RunError> {
        Ok(Self {
            engine: StrategyEngine::new(config.strategy)?,
            output: config.output,
        })
    }

    pub fn params(&self) -> &StrategyParams {
        self.engine.params()
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Classify a pre-loaded series.
    pub fn classify(&self, series: &LoadedSeries) -> ClassificationResult {
        if series.synthetic {
            warn!(symbol = %series.symbol, "classifying synthetic data; result will be tagged");
        }
        let output = self.engine.evaluate(&series.points);
        let result = ClassificationResult::from_output(
            series,
            self.engine.params(),
            output,
            self.output.wants_indicators(),
        );
        info!(
            symbol = %result.symbol,
            bars = result.bar_count,
            current = result.current_signal.map(|s| s.as_str()).unwrap_or("n/a"),
            transitions = result.transitions.len(),
            "classification complete"
        );
        result
    }

    /// Load a CSV file and classify it.
    pub fn run_file(&self, path: &Path) -> Result<ClassificationResult, RunError> {
        let series = load_csv(path)?;
        Ok(self.classify(&series))
    }
}

/// Load one CSV file and classify it with `config`.
pub fn run_single(path: &Path, config: &RunnerConfig) -> Result<ClassificationResult, RunError> {
    Runner::new(config)?.run_file(path)
}
