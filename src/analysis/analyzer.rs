//! Analyzers that combine a tokenizer with a chain of filters.
//!
//! The intent classifier persists an [`AnalyzerConfig`] rather than the
//! analyzer itself, and rebuilds the same pipeline when its artifact is loaded,
//! so that inference tokenizes exactly like training did.
//!
//! # Examples
//!
//! ```
//! use nomadia::analysis::analyzer::{Analyzer, AnalyzerConfig};
//!
//! let analyzer = AnalyzerConfig::default().build().unwrap();
//! let terms: Vec<_> = analyzer.analyze("Je veux Brik").unwrap().map(|t| t.text).collect();
//!
//! assert_eq!(terms, vec!["je", "veux", "brik", "je veux", "veux brik"]);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::{Filter, LowercaseFilter, ShingleFilter};
use crate::analysis::tokenizer::{DEFAULT_TOKEN_PATTERN, RegexTokenizer, Tokenizer};
use crate::error::{NomadiaError, Result};

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so a loaded classifier can be shared
/// across concurrently handled queries.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// A configurable analyzer that combines a tokenizer with a chain of filters.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
}

impl std::fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Get the filters used by this analyzer.
    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = self.tokenizer.tokenize(text)?;

        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }

        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }
}

/// Serializable description of the feature-extraction pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Regex whose matches become tokens.
    pub pattern: String,
    /// Lower-case tokens before building n-grams.
    pub lowercase: bool,
    /// Smallest word n-gram size.
    pub min_gram: usize,
    /// Largest word n-gram size.
    pub max_gram: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            lowercase: true,
            min_gram: 1,
            max_gram: 2,
        }
    }
}

impl AnalyzerConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.min_gram == 0 || self.min_gram > self.max_gram {
            return Err(NomadiaError::invalid_config(format!(
                "n-gram range ({}, {}) must satisfy 1 <= min <= max",
                self.min_gram, self.max_gram
            )));
        }
        if self.pattern.is_empty() {
            return Err(NomadiaError::invalid_config("token pattern cannot be empty"));
        }
        Ok(())
    }

    /// Build the analyzer described by this configuration.
    pub fn build(&self) -> Result<Arc<dyn Analyzer>> {
        self.validate()?;

        let tokenizer = Arc::new(RegexTokenizer::with_pattern(&self.pattern)?);
        let mut analyzer = PipelineAnalyzer::new(tokenizer);
        if self.lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }
        analyzer =
            analyzer.add_filter(Arc::new(ShingleFilter::new(self.min_gram, self.max_gram)?));

        Ok(Arc::new(analyzer))
    }
}
