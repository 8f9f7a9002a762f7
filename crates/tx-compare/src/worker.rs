//! Compare engine: the end-to-end pipeline from two texts to a
//! [`CompareResult`].
//!
//! [`CompareEngine`] is the primary entry point. Each call runs the guard
//! checks, tokenizes both texts, interns the tokens, computes and cleans an
//! edit script, expands it back to text, self-checks the result, and derives
//! statistics. [`CompareEngine::compare_batch`] fans independent pairs out
//! over the rayon pool.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tx_core::{ComparisonMode, Result, Segment};

use crate::cleanup::cleanup;
use crate::diff::{diff, Deadline};
use crate::expand::expand;
use crate::guard::{check_size, empty_shortcut, verify};
use crate::result::CompareResult;
use crate::stats::aggregate;
use crate::symbols::SymbolTable;
use crate::tokenize::tokenize;

// ---------------------------------------------------------------------------
// CompareConfig
// ---------------------------------------------------------------------------

/// Runtime configuration for the compare engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Wall-clock budget for the edit-script search, in milliseconds.
    /// `0` disables the deadline. Default: 1000.
    pub deadline_ms: u64,
    /// Below this many characters, an equality between two replacements is
    /// absorbed when it is no heavier than either of them. Default: 4.
    pub edit_cost: usize,
    /// Maximum length of either input, in characters. Default: 50 000.
    pub max_length: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            deadline_ms: 1000,
            edit_cost: 4,
            max_length: 50_000,
        }
    }
}

// ---------------------------------------------------------------------------
// ComparePair
// ---------------------------------------------------------------------------

/// One unit of work for [`CompareEngine::compare_batch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparePair {
    pub original: String,
    pub modified: String,
    #[serde(default)]
    pub mode: ComparisonMode,
}

impl ComparePair {
    pub fn new(
        original: impl Into<String>,
        modified: impl Into<String>,
        mode: ComparisonMode,
    ) -> Self {
        Self {
            original: original.into(),
            modified: modified.into(),
            mode,
        }
    }
}

// ---------------------------------------------------------------------------
// CompareEngine
// ---------------------------------------------------------------------------

/// Deterministic text compare engine.
///
/// The engine holds only its configuration; every call builds its own symbol
/// table and deadline, so one engine can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct CompareEngine {
    config: CompareConfig,
}

impl CompareEngine {
    /// Create a new engine with the given configuration.
    pub fn new(config: CompareConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Compare `original` against `modified` at the granularity of `mode`.
    ///
    /// # Errors
    /// [`tx_core::DiffError::InputTooLarge`] when either text is longer than
    /// `max_length` characters, and
    /// [`tx_core::DiffError::InternalInvariantViolation`] when the finished
    /// diff fails its self-check.
    pub fn compare(
        &self,
        original: &str,
        modified: &str,
        mode: ComparisonMode,
    ) -> Result<CompareResult> {
        let deadline = Deadline::from_millis(self.config.deadline_ms);
        self.compare_until(original, modified, mode, deadline)
    }

    /// Compare every pair in parallel. Results are returned in input order.
    pub fn compare_batch(&self, pairs: &[ComparePair]) -> Vec<Result<CompareResult>> {
        pairs
            .par_iter()
            .map(|pair| self.compare(&pair.original, &pair.modified, pair.mode))
            .collect()
    }

    fn compare_until(
        &self,
        original: &str,
        modified: &str,
        mode: ComparisonMode,
        deadline: Deadline,
    ) -> Result<CompareResult> {
        let start = Instant::now();

        check_size(original, modified, self.config.max_length)?;

        let (diffs, timed_out) = match empty_shortcut(original, modified) {
            Some(diffs) => (diffs, false),
            None => self.diff_texts(original, modified, mode, deadline)?,
        };

        verify(&diffs, original, modified)?;
        let statistics = aggregate(&diffs, original, modified)?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if timed_out {
            warn!(
                deadline_ms = self.config.deadline_ms,
                segments = diffs.len(),
                "comparison deadline expired; diff may not be minimal"
            );
        }
        debug!(
            mode = ?mode,
            original_len = original.len(),
            modified_len = modified.len(),
            segments = diffs.len(),
            elapsed_ms,
            "comparison finished"
        );

        Ok(CompareResult {
            mode,
            diffs,
            statistics,
            timed_out,
            elapsed_ms,
        })
    }

    /// Tokenize, intern, diff, clean up and expand two non-empty texts.
    fn diff_texts(
        &self,
        original: &str,
        modified: &str,
        mode: ComparisonMode,
        deadline: Deadline,
    ) -> Result<(Vec<Segment>, bool)> {
        let mut table = SymbolTable::new();
        let a = table.intern_tokens(&tokenize(original, mode));
        let b = table.intern_tokens(&tokenize(modified, mode));

        let outcome = diff(&a, &b, deadline);
        let script = cleanup(outcome.script, self.config.edit_cost, |s| table.weight(s));
        let diffs = expand(&script, &table)?;

        Ok((diffs, outcome.timed_out))
    }
}

/// Compare two texts with the default configuration.
pub fn compare(original: &str, modified: &str, mode: ComparisonMode) -> Result<CompareResult> {
    CompareEngine::default().compare(original, modified, mode)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
