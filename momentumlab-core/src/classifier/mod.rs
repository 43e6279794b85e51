//! Signal classification — reduces an indicator frame to one label per bar.
//!
//! A [`RuleSet`] is an ordered list of [`Rule`]s. At every bar the label starts
//! as HOLD and each rule is evaluated in order; a rule that fires overwrites
//! the current label unconditionally. The last rule to fire wins. There is no
//! first-match short-circuit and no voting.
//!
//! Two rule sets are provided, selected by [`ClassifierMode`]:
//! - `Override`: MACD crossover, then RSI threshold, then divergence.
//! - `MaConfluence`: a single conjunctive rule over MA trend, RSI and MACD.

pub mod divergence;
pub mod rule;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::domain::{Signal, SignalSeries};
use crate::indicators::IndicatorFrame;

pub use divergence::{Divergence, DivergenceDetector};
pub use rule::{Rule, RsiThresholds};

/// Which rule set a strategy classifies with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierMode {
    /// MACD crossover < RSI threshold < divergence (later overrides earlier).
    #[default]
    Override,
    /// BUY/SELL only when MA trend, RSI extremity and MACD agree.
    MaConfluence,
}

impl ClassifierMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierMode::Override => "override",
            ClassifierMode::MaConfluence => "ma_confluence",
        }
    }
}

impl fmt::Display for ClassifierMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassifierMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "override" => Ok(ClassifierMode::Override),
            "ma_confluence" | "ma_crossover" => Ok(ClassifierMode::MaConfluence),
            other => Err(format!(
                "unknown classifier mode '{other}' (expected 'override' or 'ma_confluence')"
            )),
        }
    }
}

/// What one rule proposed at one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub rule: &'static str,
    pub proposed: Option<Signal>,
}

/// Ordered override rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a rule set from rules in ascending priority order.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// MACD crossover, then RSI threshold, then divergence.
    pub fn override_rules(thresholds: RsiThresholds) -> Self {
        Self::new(vec![
            Rule::MacdCrossover,
            Rule::RsiThreshold(thresholds),
            Rule::Divergence(DivergenceDetector::new(thresholds)),
        ])
    }

    pub fn ma_confluence(thresholds: RsiThresholds) -> Self {
        Self::new(vec![Rule::MaConfluence(thresholds)])
    }

    pub fn for_mode(mode: ClassifierMode, thresholds: RsiThresholds) -> Self {
        match mode {
            ClassifierMode::Override => Self::override_rules(thresholds),
            ClassifierMode::MaConfluence => Self::ma_confluence(thresholds),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Final label at `index` after every rule has had its turn.
    pub fn label_at(&self, frame: &IndicatorFrame, index: usize) -> Signal {
        let mut label = Signal::Hold;
        for rule in &self.rules {
            if let Some(proposed) = rule.evaluate(frame, index) {
                if proposed != label {
                    trace!(index, rule = rule.name(), from = %label, to = %proposed, "rule override");
                }
                label = proposed;
            }
        }
        label
    }

    /// Label every bar of the frame.
    pub fn classify(&self, frame: &IndicatorFrame) -> SignalSeries {
        let labels: Vec<Signal> = (0..frame.len())
            .map(|i| self.label_at(frame, i))
            .collect();
        SignalSeries::from(labels)
    }

    /// Every rule's proposal at `index`, in evaluation order.
    ///
    /// The final label is the last `Some` in the list, or HOLD if there is none.
    pub fn explain(&self, frame: &IndicatorFrame, index: usize) -> Vec<RuleOutcome> {
        self.rules
            .iter()
            .map(|rule| RuleOutcome {
                rule: rule.name(),
                proposed: rule.evaluate(frame, index),
            })
            .collect()
    }
}
