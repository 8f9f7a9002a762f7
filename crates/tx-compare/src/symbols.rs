//! Token interning.
//!
//! Each distinct token text is mapped to a dense [`Symbol`] so the edit-script
//! search compares integers instead of strings, whatever the granularity.
//! Symbols are handed out in first-seen order, which keeps the mapping (and
//! everything downstream of it) deterministic for a given input pair.

use std::collections::HashMap;

use tx_core::Token;

/// Compact surrogate for one distinct token text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(usize);

impl Symbol {
    pub(crate) const fn new(index: usize) -> Self {
        Symbol(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Bidirectional token ⇄ symbol mapping, owned by a single comparison.
#[derive(Debug, Default)]
pub struct SymbolTable<'a> {
    ids: HashMap<&'a str, Symbol>,
    texts: Vec<&'a str>,
    /// Character length of each interned text, indexed by symbol.
    weights: Vec<usize>,
}

impl<'a> SymbolTable<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the symbol for `text`, allocating the next one if unseen.
    pub fn intern(&mut self, text: &'a str) -> Symbol {
        if let Some(&symbol) = self.ids.get(text) {
            return symbol;
        }
        let symbol = Symbol(self.texts.len());
        self.ids.insert(text, symbol);
        self.texts.push(text);
        self.weights.push(text.chars().count());
        symbol
    }

    /// Intern every token in order.
    pub fn intern_tokens(&mut self, tokens: &[Token<'a>]) -> Vec<Symbol> {
        tokens.iter().map(|t| self.intern(t.text)).collect()
    }

    /// Original text of `symbol`, or `None` if it came from another table.
    pub fn resolve(&self, symbol: Symbol) -> Option<&'a str> {
        self.texts.get(symbol.0).copied()
    }

    /// Character length of the text behind `symbol` (0 if unknown).
    pub fn weight(&self, symbol: Symbol) -> usize {
        self.weights.get(symbol.0).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}
