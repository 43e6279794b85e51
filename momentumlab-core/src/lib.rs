//! MomentumLab Core — indicators and signal classification for price series.
//!
//! This crate contains the pure computational engine:
//! - Domain types (price points, signals, signal series)
//! - Indicators (EMA, MACD, RSI, SMA) assembled into a per-bar frame
//! - Ordered override rules, including MACD/RSI divergence
//! - The stateless strategy engine: price series in, signal series out
//! - Parameter and dataset fingerprints
//!
//! No I/O, no clocks, no shared state. Every call is a pure function of its
//! inputs.

pub mod classifier;
pub mod domain;
pub mod fingerprint;
pub mod indicators;
pub mod strategy;

pub use classifier::{ClassifierMode, Divergence, DivergenceDetector, Rule, RsiThresholds, RuleSet};
pub use domain::{PricePoint, Signal, SignalCounts, SignalSeries};
pub use fingerprint::{dataset_hash, DatasetHash, ParamsHash};
pub use indicators::{IndicatorEngine, IndicatorFrame, IndicatorRow, IndicatorWindows};
pub use strategy::{classify, evaluate, ParamError, StrategyEngine, StrategyOutput, StrategyParams};
