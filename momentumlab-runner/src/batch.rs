//! Batch classification across many series.
//!
//! Series are independent, so a batch is a plain rayon map over one shared
//! [`Runner`]. Results keep input order. A failure on one input does not
//! stop the others.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, warn};

use momentumlab_core::Signal;

use crate::loader::LoadedSeries;
use crate::result::ClassificationResult;
use crate::runner::{RunError, Runner};

/// Batch executor. Parallel by default.
pub struct BatchRunner {
    runner: Runner,
    parallel: bool,
}

/// Outcome for one input file.
#[derive(Debug)]
pub struct BatchEntry {
    pub input: PathBuf,
    pub outcome: Result<ClassificationResult, RunError>,
}

impl BatchRunner {
    pub fn new(runner: Runner) -> Self {
        Self {
            runner,
            parallel: true,
        }
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    /// Classify pre-loaded series.
    pub fn classify_all(&self, series: &[LoadedSeries]) -> Vec<ClassificationResult> {
        debug!(count = series.len(), parallel = self.parallel, "batch classify");
        if self.parallel {
            series.par_iter().map(|s| self.runner.classify(s)).collect()
        } else {
            series.iter().map(|s| self.runner.classify(s)).collect()
        }
    }

    /// Load and classify CSV files.
    pub fn run_files(&self, inputs: &[PathBuf]) -> BatchResults {
        debug!(count = inputs.len(), parallel = self.parallel, "batch run");
        let run = |path: &PathBuf| {
            let outcome = self.runner.run_file(path);
            if let Err(e) = &outcome {
                warn!(input = %path.display(), error = %e, "batch input failed");
            }
            BatchEntry {
                input: path.clone(),
                outcome,
            }
        };

        let entries: Vec<BatchEntry> = if self.parallel {
            inputs.par_iter().map(run).collect()
        } else {
            inputs.iter().map(run).collect()
        };
        BatchResults { entries }
    }
}

/// Results from a batch, in input order.
#[derive(Debug)]
pub struct BatchResults {
    entries: Vec<BatchEntry>,
}

impl BatchResults {
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &ClassificationResult> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&PathBuf, &RunError)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().err().map(|err| (&e.input, err)))
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed().next().is_none()
    }

    /// Successful results whose last bar carries `signal`.
    pub fn with_current(&self, signal: Signal) -> Vec<&ClassificationResult> {
        self.succeeded()
            .filter(|r| r.current_signal == Some(signal))
            .collect()
    }
}
