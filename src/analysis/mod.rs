//! Text analysis for short travel queries.
//!
//! Raw text flows through a tokenizer and a chain of token filters:
//!
//! ```text
//! "Parle moi de Sidi Bou Said"
//!        ↓ RegexTokenizer (\b\w\w+\b)
//! [Parle, moi, de, Sidi, Bou, Said]
//!        ↓ LowercaseFilter
//! [parle, moi, de, sidi, bou, said]
//!        ↓ ShingleFilter (1..=2)
//! [parle, moi, de, sidi, bou, said, parle moi, moi de, de sidi, sidi bou, bou said]
//! ```
//!
//! The resulting terms are the features of the intent classifier.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, AnalyzerConfig, PipelineAnalyzer};
pub use token::{Token, TokenStream};
