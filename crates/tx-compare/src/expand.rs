//! Result expander: maps a symbol-level edit script back to literal text.

use tx_core::{DiffError, Result, Segment};

use crate::diff::Edit;
use crate::symbols::SymbolTable;

/// Turn `script` into [`Segment`]s by resolving every symbol through `table`
/// and concatenating the token texts of each run.
///
/// Runs sharing an operation are merged and empty runs are skipped, so the
/// output never holds two adjacent segments with the same operation. A
/// symbol missing from `table` is an engine bug and is reported as
/// [`DiffError::InternalInvariantViolation`].
pub fn expand(script: &[Edit], table: &SymbolTable<'_>) -> Result<Vec<Segment>> {
    let mut segments: Vec<Segment> = Vec::with_capacity(script.len());

    for edit in script.iter().filter(|e| !e.is_empty()) {
        let mut text = String::new();
        for &symbol in &edit.symbols {
            let token = table.resolve(symbol).ok_or_else(|| {
                DiffError::InternalInvariantViolation(format!(
                    "symbol {} is missing from the symbol table",
                    symbol.index()
                ))
            })?;
            text.push_str(token);
        }

        match segments.last_mut() {
            Some(last) if last.operation == edit.op => last.text.push_str(&text),
            _ => segments.push(Segment::new(edit.op, text)),
        }
    }

    Ok(segments)
}
