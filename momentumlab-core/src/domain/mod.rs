//! Domain types for MomentumLab

pub mod price;
pub mod signal;

pub use price::{closes, PricePoint};
pub use signal::{Signal, SignalCounts, SignalSeries};
