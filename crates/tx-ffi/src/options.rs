//! JSON request shapes accepted by the `txcmp_*` functions.

use serde::Deserialize;

use tx_compare::{CompareConfig, ComparePair};
use tx_core::{ComparisonMode, DiffError, Result};

use crate::marshal::deserialize_json;

/// Options object passed as `options_json`: an optional `mode` plus any
/// [`CompareConfig`] fields. Missing fields take their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CompareOptions {
    #[serde(default)]
    pub mode: ComparisonMode,
    #[serde(flatten)]
    pub config: CompareConfig,
}

impl CompareOptions {
    /// Parse an options object. Blank input means all defaults.
    pub fn parse(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        deserialize_json(json).map_err(DiffError::InvalidOptions)
    }
}

/// One element of the `requests_json` array of `txcmp_compare_batch`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchRequest {
    pub original: String,
    pub modified: String,
    /// Falls back to the batch-wide mode from the options object.
    #[serde(default)]
    pub mode: Option<ComparisonMode>,
}

impl BatchRequest {
    pub fn into_pair(self, default_mode: ComparisonMode) -> ComparePair {
        ComparePair::new(
            self.original,
            self.modified,
            self.mode.unwrap_or(default_mode),
        )
    }
}

/// Parse the `requests_json` array of a batch call.
pub fn parse_batch(json: &str) -> Result<Vec<BatchRequest>> {
    deserialize_json(json).map_err(|e| DiffError::InvalidOptions(format!("batch requests: {e}")))
}
