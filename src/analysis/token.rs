//! Token types for text analysis.
//!
//! # Examples
//!
//! ```
//! use nomadia::analysis::token::Token;
//!
//! let token = Token::with_offsets("couscous", 2, 12, 20);
//! assert_eq!(token.text, "couscous");
//! assert_eq!(token.position, 2);
//! assert_eq!(token.end_offset, 20);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single unit of text produced by a tokenizer or a filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// The position of the token in the original token stream (0-based)
    pub position: usize,

    /// The byte offset where this token starts in the original text
    pub start_offset: usize,

    /// The byte offset where this token ends in the original text
    pub end_offset: usize,

    /// How many positions this token spans (default: 1).
    ///
    /// Word shingles built from two consecutive tokens have a length of 2.
    pub position_length: usize,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset: 0,
            end_offset: 0,
            position_length: 1,
        }
    }

    /// Create a new token with text, position, and byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
            position_length: 1,
        }
    }

    /// Set the number of positions this token spans.
    pub fn with_position_length(mut self, position_length: usize) -> Self {
        self.position_length = position_length;
        self
    }

    /// Clone this token with updated text.
    pub fn with_text<S: Into<String>>(&self, text: S) -> Self {
        let mut token = self.clone();
        token.text = text.into();
        token
    }

    /// Get the length of the token text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A stream of tokens flowing through the analysis pipeline.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new("brik", 0);
        assert_eq!(token.text, "brik");
        assert_eq!(token.position, 0);
        assert_eq!(token.position_length, 1);
        assert_eq!(token.len(), 4);
        assert!(!token.is_empty());
    }

    #[test]
    fn test_token_with_text_keeps_offsets() {
        let token = Token::with_offsets("Douz", 3, 10, 14);
        let lowered = token.with_text("douz");
        assert_eq!(lowered.text, "douz");
        assert_eq!(lowered.start_offset, 10);
        assert_eq!(lowered.end_offset, 14);
        assert_eq!(token.to_string(), "Douz");
    }
}
