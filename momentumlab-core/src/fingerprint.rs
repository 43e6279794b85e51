//! Run fingerprinting — deterministic identification of params and inputs.
//!
//! - `ParamsHash`: BLAKE3 over the canonical JSON of a `StrategyParams`.
//! - `DatasetHash`: BLAKE3 over every timestamp and close bit pattern.
//!
//! Classification is a pure function of (series, params), so two runs with the
//! same pair of hashes produce identical signal series.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::PricePoint;
use crate::strategy::StrategyParams;

/// Hash of a parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamsHash(pub String);

/// Hash of a price series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetHash(pub String);

impl fmt::Display for ParamsHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StrategyParams {
    /// Exact identity: mode, every window and both thresholds.
    pub fn params_hash(&self) -> ParamsHash {
        // Struct field order is fixed, so the JSON is canonical.
        let json = serde_json::to_string(self).unwrap_or_default();
        ParamsHash(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}

/// Deterministic hash over a price series.
pub fn dataset_hash(series: &[PricePoint]) -> DatasetHash {
    let mut hasher = blake3::Hasher::new();
    for point in series {
        hasher.update(&point.timestamp.and_utc().timestamp_micros().to_le_bytes());
        hasher.update(&point.close.to_bits().to_le_bytes());
    }
    DatasetHash(hasher.finalize().to_hex().to_string())
}
