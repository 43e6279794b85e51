//! Synthetic price series for demos, benches and smoke tests.
//!
//! A random walk from 100.0, seeded from the BLAKE3 hash of the symbol so the
//! same symbol always yields the same series. Results produced from these
//! series are tagged `synthetic`.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use momentumlab_core::PricePoint;

use crate::loader::LoadedSeries;

/// Shape of a generated series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticOptions {
    pub bars: usize,
    pub start: NaiveDateTime,
    /// Spacing between consecutive bars.
    pub interval: Duration,
    /// Largest absolute per-bar return.
    pub max_step: f64,
}

impl Default for SyntheticOptions {
    /// One regular session of one-minute bars.
    fn default() -> Self {
        Self {
            bars: 390,
            start: NaiveDate::from_ymd_opt(2024, 1, 2)
                .and_then(|d| d.and_hms_opt(9, 30, 0))
                .unwrap_or_default(),
            interval: Duration::minutes(1),
            max_step: 0.005,
        }
    }
}

/// Options that cannot produce an ascending series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntheticError {
    #[error("bar interval must be positive (got {0})")]
    NonPositiveInterval(Duration),

    #[error("timestamp of bar {bar} is out of range (start {start}, interval {interval})")]
    TimestampOverflow {
        bar: usize,
        start: NaiveDateTime,
        interval: Duration,
    },
}

/// Generate a deterministic random-walk series for `symbol`.
pub fn generate_synthetic(
    symbol: &str,
    opts: &SyntheticOptions,
) -> Result<LoadedSeries, SyntheticError> {
    if opts.interval <= Duration::zero() {
        return Err(SyntheticError::NonPositiveInterval(opts.interval));
    }

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let step = opts.max_step.abs();
    let mut price = 100.0_f64;
    let mut next = Some(opts.start);
    let mut points = Vec::with_capacity(opts.bars);

    for bar in 0..opts.bars {
        let timestamp = next.ok_or(SyntheticError::TimestampOverflow {
            bar,
            start: opts.start,
            interval: opts.interval,
        })?;
        points.push(PricePoint::new(timestamp, price));
        let ret: f64 = if step > 0.0 {
            rng.gen_range(-step..step)
        } else {
            0.0
        };
        price *= 1.0 + ret;
        next = timestamp.checked_add_signed(opts.interval);
    }

    Ok(LoadedSeries {
        symbol: symbol.to_string(),
        points,
        synthetic: true,
    })
}
