//! Token filters applied after tokenization.

use crate::analysis::token::{Token, TokenStream};
use crate::error::{NomadiaError, Result};

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// A filter that converts tokens to lowercase.
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(|token| {
            let lowered = token.text.to_lowercase();
            token.with_text(lowered)
        })))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

/// A filter that emits word n-grams ("shingles") of consecutive tokens.
///
/// All n-grams of size `min_size` come first, then `min_size + 1`, and so on
/// up to `max_size`. Words inside a shingle are joined by a single space.
///
/// # Examples
///
/// ```
/// use nomadia::analysis::token::Token;
/// use nomadia::analysis::token_filter::{Filter, ShingleFilter};
///
/// let filter = ShingleFilter::new(1, 2).unwrap();
/// let tokens = vec![Token::new("sidi", 0), Token::new("bou", 1), Token::new("said", 2)];
/// let texts: Vec<_> = filter
///     .filter(Box::new(tokens.into_iter()))
///     .unwrap()
///     .map(|t| t.text)
///     .collect();
///
/// assert_eq!(texts, vec!["sidi", "bou", "said", "sidi bou", "bou said"]);
/// ```
#[derive(Clone, Debug)]
pub struct ShingleFilter {
    min_size: usize,
    max_size: usize,
}

impl ShingleFilter {
    /// Create a shingle filter producing n-grams for every n in `min_size..=max_size`.
    pub fn new(min_size: usize, max_size: usize) -> Result<Self> {
        if min_size == 0 || min_size > max_size {
            return Err(NomadiaError::analysis(format!(
                "Invalid shingle range ({min_size}, {max_size})"
            )));
        }
        Ok(ShingleFilter { min_size, max_size })
    }

    /// Smallest n-gram size.
    pub fn min_size(&self) -> usize {
        self.min_size
    }

    /// Largest n-gram size.
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Filter for ShingleFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let words: Vec<Token> = tokens.collect();
        let mut shingles = Vec::new();

        for size in self.min_size..=self.max_size {
            if size > words.len() {
                break;
            }
            for window in words.windows(size) {
                let first = &window[0];
                let last = &window[size - 1];
                let text = window
                    .iter()
                    .map(|token| token.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                shingles.push(
                    Token::with_offsets(text, first.position, first.start_offset, last.end_offset)
                        .with_position_length(size),
                );
            }
        }

        Ok(Box::new(shingles.into_iter()))
    }

    fn name(&self) -> &'static str {
        "shingle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(words: &[&str]) -> TokenStream {
        let tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new(*w, i))
            .collect();
        Box::new(tokens.into_iter())
    }

    #[test]
    fn test_lowercase_filter() {
        let filter = LowercaseFilter::new();
        let result: Vec<_> = filter
            .filter(stream(&["Parle", "MOI", "Désert"]))
            .unwrap()
            .map(|t| t.text)
            .collect();
        assert_eq!(result, vec!["parle", "moi", "désert"]);
    }

    #[test]
    fn test_shingles_unigrams_then_bigrams() {
        let filter = ShingleFilter::new(1, 2).unwrap();
        let result: Vec<_> = filter.filter(stream(&["je", "veux", "brik"])).unwrap().collect();

        let texts: Vec<_> = result.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["je", "veux", "brik", "je veux", "veux brik"]);
        assert_eq!(result[3].position_length, 2);
        assert_eq!(result[4].position, 1);
    }

    #[test]
    fn test_shingles_shorter_than_window() {
        let filter = ShingleFilter::new(2, 3).unwrap();
        let result: Vec<_> = filter.filter(stream(&["douz"])).unwrap().collect();
        assert!(result.is_empty());
    }

    #[test]
    fn test_invalid_shingle_range() {
        assert!(ShingleFilter::new(0, 2).is_err());
        assert!(ShingleFilter::new(3, 2).is_err());
    }
}
