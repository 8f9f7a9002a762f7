/// Atomic unit of text produced by the tokenizer: one character, one run of
/// word or whitespace characters, or one line with its terminator.
///
/// `text` borrows from the tokenized input, so concatenating the `text` of
/// every token in order reproduces that input exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}
