//! Granularity-aware tokenizer.
//!
//! Tokenization rules per [`ComparisonMode`]:
//! - `CharacterLevel`: one token per Unicode scalar value.
//! - `WordLevel`: alternating maximal runs of non-whitespace (words, digits
//!   and punctuation together) and whitespace (spaces, tabs, newlines).
//! - `LineLevel`: one token per line, each carrying its `'\n'` terminator;
//!   only the final line may lack one.
//!
//! Every token borrows a slice of the input and no character is ever dropped,
//! so concatenating the tokens reproduces the input byte for byte.
//!
//! Example:
//!   "The cat  sat" (word level) →
//!   [The][ ][cat][  ][sat]

use tx_core::{ComparisonMode, Token};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Split `text` into [`Token`]s at the granularity selected by `mode`.
///
/// Total over every input; an empty `text` yields no tokens in any mode.
pub fn tokenize(text: &str, mode: ComparisonMode) -> Vec<Token<'_>> {
    match mode {
        ComparisonMode::CharacterLevel => split_chars(text),
        ComparisonMode::WordLevel => split_words(text),
        ComparisonMode::LineLevel => split_lines(text),
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn split_chars(text: &str) -> Vec<Token<'_>> {
    text.char_indices()
        .map(|(offset, ch)| Token::new(&text[offset..offset + ch.len_utf8()]))
        .collect()
}

/// Cut `text` wherever the whitespace class of consecutive characters flips.
fn split_words(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, first)) = chars.next() {
        let in_whitespace = first.is_whitespace();
        let mut end = start + first.len_utf8();

        while let Some(&(offset, ch)) = chars.peek() {
            if ch.is_whitespace() != in_whitespace {
                break;
            }
            end = offset + ch.len_utf8();
            chars.next();
        }

        tokens.push(Token::new(&text[start..end]));
    }

    tokens
}

fn split_lines(text: &str) -> Vec<Token<'_>> {
    text.split_inclusive('\n').map(Token::new).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
