//! Error types for the Nomadia library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`NomadiaError`] enum. Only the trainer's precondition failures and explicit
//! artifact loads are meant to abort a caller; retrieval absorbs its own
//! failures and never surfaces them.
//!
//! # Examples
//!
//! ```
//! use nomadia::error::{NomadiaError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(NomadiaError::corpus("no templates"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Nomadia operations.
#[derive(Error, Debug)]
pub enum NomadiaError {
    /// I/O errors (artifact files, configuration files, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Synthetic corpus errors (empty vocabulary, malformed templates)
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Training errors (empty learned vocabulary, degenerate splits)
    #[error("Training error: {0}")]
    Training(String),

    /// Model artifact errors (missing, corrupt, incompatible)
    #[error("Model error: {0}")]
    Model(String),

    /// Knowledge base errors (duplicate ids, unreadable files)
    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with NomadiaError.
pub type Result<T> = std::result::Result<T, NomadiaError>;

impl NomadiaError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        NomadiaError::Analysis(msg.into())
    }

    /// Create a new corpus error.
    pub fn corpus<S: Into<String>>(msg: S) -> Self {
        NomadiaError::Corpus(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        NomadiaError::Training(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        NomadiaError::Model(msg.into())
    }

    /// Create a new knowledge base error.
    pub fn knowledge_base<S: Into<String>>(msg: S) -> Self {
        NomadiaError::KnowledgeBase(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        NomadiaError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        NomadiaError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = NomadiaError::corpus("no templates");
        assert_eq!(error.to_string(), "Corpus error: no templates");

        let error = NomadiaError::model("artifact truncated");
        assert_eq!(error.to_string(), "Model error: artifact truncated");

        let error = NomadiaError::invalid_config("test_ratio must be in (0, 1)");
        assert_eq!(
            error.to_string(),
            "Configuration error: test_ratio must be in (0, 1)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let nomadia_error = NomadiaError::from(io_error);

        match nomadia_error {
            NomadiaError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
