//! Strategy composition — params, validation and the stateless engine.

pub mod engine;
pub mod params;

pub use engine::{classify, evaluate, StrategyEngine, StrategyOutput};
pub use params::{ParamError, StrategyParams};
