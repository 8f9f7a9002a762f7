use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which of the two compared inputs an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSide {
    Original,
    Modified,
}

impl fmt::Display for InputSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSide::Original => f.write_str("original"),
            InputSide::Modified => f.write_str("modified"),
        }
    }
}

/// Top-level error type for the tx-core crate and dependents.
///
/// A comparison that runs past its deadline is not an error: it still yields
/// a valid (possibly non-minimal) result flagged as timed out.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("{side} text is too large: {length} characters (limit {max_length})")]
    InputTooLarge {
        side: InputSide,
        length: usize,
        max_length: usize,
    },

    #[error("internal invariant violation: {0}")]
    InternalInvariantViolation(String),

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

/// Convenience Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, DiffError>;
