//! Compare result types: the structured output of the compare engine.
//!
//! These types are serialized to JSON for the rendering layer, which draws
//! each [`Segment`] keyed by its operation and must not re-cut boundaries.

use std::fmt;

use serde::{Deserialize, Serialize};

use tx_core::{ComparisonMode, Segment};

// ---------------------------------------------------------------------------
// ChangeLevel
// ---------------------------------------------------------------------------

/// Coarse classification of how much a text changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeLevel {
    /// Change ratio below 0.1.
    Minimal,
    /// Change ratio below 0.3.
    Moderate,
    /// Change ratio below 0.6.
    Significant,
    Major,
}

impl ChangeLevel {
    /// Classify a change ratio. Thresholds are fixed and locale-independent.
    pub fn from_ratio(change_ratio: f64) -> Self {
        if change_ratio < 0.1 {
            ChangeLevel::Minimal
        } else if change_ratio < 0.3 {
            ChangeLevel::Moderate
        } else if change_ratio < 0.6 {
            ChangeLevel::Significant
        } else {
            ChangeLevel::Major
        }
    }
}

impl fmt::Display for ChangeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeLevel::Minimal => "minimal",
            ChangeLevel::Moderate => "moderate",
            ChangeLevel::Significant => "significant",
            ChangeLevel::Major => "major",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Counts derived from a finished diff sequence.
///
/// Character counts are in Unicode scalar values. Word and line counts only
/// cover inserted and deleted text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Statistics {
    /// Sum of the lengths of all segments, whatever their operation.
    pub total_characters: usize,
    pub added_characters: usize,
    pub deleted_characters: usize,
    pub unchanged_characters: usize,
    pub added_words: usize,
    pub deleted_words: usize,
    pub added_lines: usize,
    pub deleted_lines: usize,
    /// Unchanged share of `total_characters`, in [0, 100], two decimals.
    pub similarity_percentage: f64,
    /// `added_characters + deleted_characters`.
    pub total_changes: usize,
    /// `total_changes` over the length of the longer input.
    pub change_ratio: f64,
}

impl Statistics {
    /// Statistics of a comparison between two empty texts.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn change_level(&self) -> ChangeLevel {
        ChangeLevel::from_ratio(self.change_ratio)
    }
}

// ---------------------------------------------------------------------------
// CompareResult
// ---------------------------------------------------------------------------

/// The output of a single comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareResult {
    /// Granularity the texts were compared at.
    pub mode: ComparisonMode,
    /// Ordered segments; see [`tx_core::reconstruct_original`].
    pub diffs: Vec<Segment>,
    pub statistics: Statistics,
    /// `true` when the search deadline expired and `diffs` may be coarser
    /// than a minimal diff. The segments are still exact.
    pub timed_out: bool,
    /// Wall-clock duration of the comparison in milliseconds.
    pub elapsed_ms: u64,
}

impl CompareResult {
    pub fn change_level(&self) -> ChangeLevel {
        self.statistics.change_level()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_level_thresholds() {
        assert_eq!(ChangeLevel::from_ratio(0.0), ChangeLevel::Minimal);
        assert_eq!(ChangeLevel::from_ratio(0.0999), ChangeLevel::Minimal);
        assert_eq!(ChangeLevel::from_ratio(0.1), ChangeLevel::Moderate);
        assert_eq!(ChangeLevel::from_ratio(0.2999), ChangeLevel::Moderate);
        assert_eq!(ChangeLevel::from_ratio(0.3), ChangeLevel::Significant);
        assert_eq!(ChangeLevel::from_ratio(0.5999), ChangeLevel::Significant);
        assert_eq!(ChangeLevel::from_ratio(0.6), ChangeLevel::Major);
        assert_eq!(ChangeLevel::from_ratio(2.0), ChangeLevel::Major);
    }

    #[test]
    fn change_level_displays_lowercase() {
        assert_eq!(ChangeLevel::Significant.to_string(), "significant");
    }

    #[test]
    fn change_level_serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&ChangeLevel::Major).unwrap(),
            "\"major\""
        );
    }

    #[test]
    fn empty_statistics_are_all_zero() {
        let stats = Statistics::empty();
        assert_eq!(stats.total_characters, 0);
        assert_eq!(stats.similarity_percentage, 0.0);
        assert_eq!(stats.change_level(), ChangeLevel::Minimal);
    }

    #[test]
    fn compare_result_round_trips_json() {
        let result = CompareResult {
            mode: ComparisonMode::LineLevel,
            diffs: vec![Segment::equal("a\n"), Segment::insert("b\n")],
            statistics: Statistics {
                total_characters: 4,
                added_characters: 2,
                unchanged_characters: 2,
                added_words: 1,
                added_lines: 1,
                similarity_percentage: 50.0,
                total_changes: 2,
                change_ratio: 0.5,
                ..Statistics::default()
            },
            timed_out: false,
            elapsed_ms: 3,
        };
        let json = serde_json::to_string(&result).expect("serialize");
        assert!(json.contains("\"mode\":\"line_level\""));
        assert!(json.contains("\"operation\":\"insert\""));
        let restored: CompareResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, result);
        assert_eq!(restored.change_level(), ChangeLevel::Significant);
    }
}
