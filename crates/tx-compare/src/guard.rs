//! Pre-flight and post-flight checks around the compare pipeline.
//!
//! Pre-flight: the size ceiling and the empty-input shortcuts, which bypass
//! the edit-script engine entirely. Post-flight: [`verify`] re-checks the
//! reconstruction and shape invariants of a finished diff sequence.

use tracing::{debug, error, warn};

use tx_core::{reconstruct_modified, reconstruct_original, DiffError, InputSide, Result, Segment};

// ---------------------------------------------------------------------------
// Pre-flight
// ---------------------------------------------------------------------------

/// Reject inputs longer than `max_length` characters. The original is checked
/// first.
pub fn check_size(original: &str, modified: &str, max_length: usize) -> Result<()> {
    for (side, text) in [(InputSide::Original, original), (InputSide::Modified, modified)] {
        // Byte length bounds the char count from above.
        if text.len() <= max_length {
            continue;
        }
        let length = text.chars().count();
        if length > max_length {
            warn!(%side, length, max_length, "input exceeds size ceiling");
            return Err(DiffError::InputTooLarge {
                side,
                length,
                max_length,
            });
        }
    }
    Ok(())
}

/// Diff sequence for the trivial cases where either input is empty, or
/// `None` when both are non-empty.
pub fn empty_shortcut(original: &str, modified: &str) -> Option<Vec<Segment>> {
    let diffs = match (original.is_empty(), modified.is_empty()) {
        (true, true) => Vec::new(),
        (true, false) => vec![Segment::insert(modified)],
        (false, true) => vec![Segment::delete(original)],
        (false, false) => return None,
    };
    debug!(segments = diffs.len(), "empty input, search skipped");
    Some(diffs)
}

// ---------------------------------------------------------------------------
// Post-flight
// ---------------------------------------------------------------------------

/// Check that `diffs` reconstructs both inputs, holds no empty segment and
/// never repeats an operation on adjacent segments.
pub fn verify(diffs: &[Segment], original: &str, modified: &str) -> Result<()> {
    let outcome = check_invariants(diffs, original, modified);
    if let Err(DiffError::InternalInvariantViolation(reason)) = &outcome {
        error!(reason = %reason, segments = diffs.len(), "diff failed self-check");
    }
    outcome
}

fn check_invariants(diffs: &[Segment], original: &str, modified: &str) -> Result<()> {
    if reconstruct_original(diffs) != original {
        return Err(violation("segments do not reconstruct the original text"));
    }
    if reconstruct_modified(diffs) != modified {
        return Err(violation("segments do not reconstruct the modified text"));
    }
    if let Some(pos) = diffs.iter().position(|s| s.text.is_empty()) {
        return Err(violation(format!("segment {pos} is empty")));
    }
    if let Some(pos) = diffs
        .windows(2)
        .position(|pair| pair[0].operation == pair[1].operation)
    {
        return Err(violation(format!(
            "segments {pos} and {} share the {:?} operation",
            pos + 1,
            diffs[pos].operation
        )));
    }
    Ok(())
}

fn violation(reason: impl Into<String>) -> DiffError {
    DiffError::InternalInvariantViolation(reason.into())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
