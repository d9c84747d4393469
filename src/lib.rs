//! # Nomadia
//!
//! Retrieval-augmented context pipeline for a Tunisia travel assistant.
//!
//! ## Features
//!
//! - Synthetic corpus generation from a vocabulary table and sentence templates
//! - Word n-gram TF-IDF features and multinomial naive Bayes intent classification
//! - Seeded, reproducible training with an evaluation report
//! - Union-based knowledge base selection (intent, keyword, wildcard)
//! - Prompt construction around the retrieved context

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod ml;
pub mod prompt;

pub mod prelude {
    pub use crate::error::{NomadiaError, Result};
    pub use crate::knowledge::{ContextRetriever, KnowledgeBase, KnowledgeEntry};
    pub use crate::ml::{ClassifierState, Intent, IntentClassifier, IntentModel};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
