use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// Disposition of a span of text in a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Present in both texts.
    Equal,
    /// Present only in the modified text.
    Insert,
    /// Present only in the original text.
    Delete,
}

impl Operation {
    /// `true` for the operations that contribute to the original text.
    pub fn in_original(self) -> bool {
        matches!(self, Operation::Equal | Operation::Delete)
    }

    /// `true` for the operations that contribute to the modified text.
    pub fn in_modified(self) -> bool {
        matches!(self, Operation::Equal | Operation::Insert)
    }
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// A maximal run of one operation with its literal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub operation: Operation,
    pub text: String,
}

impl Segment {
    pub fn new(operation: Operation, text: impl Into<String>) -> Self {
        Self {
            operation,
            text: text.into(),
        }
    }

    pub fn equal(text: impl Into<String>) -> Self {
        Self::new(Operation::Equal, text)
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Self::new(Operation::Insert, text)
    }

    pub fn delete(text: impl Into<String>) -> Self {
        Self::new(Operation::Delete, text)
    }

    /// Length of the segment text in Unicode scalar values.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Rebuild the original text from Equal and Delete segments.
pub fn reconstruct_original(segments: &[Segment]) -> String {
    segments
        .iter()
        .filter(|s| s.operation.in_original())
        .map(|s| s.text.as_str())
        .collect()
}

/// Rebuild the modified text from Equal and Insert segments.
pub fn reconstruct_modified(segments: &[Segment]) -> String {
    segments
        .iter()
        .filter(|s| s.operation.in_modified())
        .map(|s| s.text.as_str())
        .collect()
}

// ---------------------------------------------------------------------------
// ComparisonMode
// ---------------------------------------------------------------------------

/// Granularity at which two texts are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// One unit per Unicode scalar value.
    #[serde(alias = "character")]
    CharacterLevel,
    /// Alternating runs of non-whitespace and whitespace.
    #[default]
    #[serde(alias = "word")]
    WordLevel,
    /// One unit per line, terminator included.
    #[serde(alias = "line")]
    LineLevel,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
