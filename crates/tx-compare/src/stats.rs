//! Statistics aggregation over a finished diff sequence.

use regex::Regex;

use tx_core::{DiffError, Operation, Result, Segment};

use crate::result::Statistics;

/// A word is a maximal run of Unicode letters and numbers.
const WORD_PATTERN: &str = r"[\p{L}\p{N}]+";

/// Walk `diffs` once and derive the [`Statistics`] of the comparison between
/// `original` and `modified`.
pub fn aggregate(diffs: &[Segment], original: &str, modified: &str) -> Result<Statistics> {
    let words = Regex::new(WORD_PATTERN)
        .map_err(|e| DiffError::InternalInvariantViolation(format!("word pattern: {e}")))?;
    let mut stats = Statistics::default();

    for segment in diffs {
        let chars = segment.char_len();
        stats.total_characters += chars;

        match segment.operation {
            Operation::Equal => stats.unchanged_characters += chars,
            Operation::Insert => {
                stats.added_characters += chars;
                stats.added_words += count_words(&words, &segment.text);
                stats.added_lines += count_lines(&segment.text);
            }
            Operation::Delete => {
                stats.deleted_characters += chars;
                stats.deleted_words += count_words(&words, &segment.text);
                stats.deleted_lines += count_lines(&segment.text);
            }
        }
    }

    stats.total_changes = stats.added_characters + stats.deleted_characters;

    let longest = original
        .chars()
        .count()
        .max(modified.chars().count())
        .max(1);
    stats.change_ratio = stats.total_changes as f64 / longest as f64;

    let similarity =
        stats.unchanged_characters as f64 / stats.total_characters.max(1) as f64 * 100.0;
    stats.similarity_percentage = round2(similarity.clamp(0.0, 100.0));

    Ok(stats)
}

/// Number of words in `text`, as matched by `words`.
pub fn count_words(words: &Regex, text: &str) -> usize {
    words.find_iter(text).count()
}

/// Number of lines touched by `text`: one per `'\n'`, plus one for a trailing
/// partial line.
pub fn count_lines(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    let terminators = text.matches('\n').count();
    if text.ends_with('\n') {
        terminators
    } else {
        terminators + 1
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
