//! Intent classification for travel queries.
//!
//! - [`corpus`]: synthetic training data from a vocabulary table and templates
//! - [`tfidf`]: word n-gram TF-IDF features
//! - [`naive_bayes`]: multinomial naive Bayes over those features
//! - [`classifier`]: the fitted model, its artifact and the startup state
//! - [`metrics`]: evaluation report
//! - [`trainer`]: the end-to-end training pipeline
//!
//! # Example
//!
//! ```rust,no_run
//! use nomadia::ml::{CorpusDefinition, IntentClassifier, Trainer, TrainerConfig};
//!
//! # fn main() -> nomadia::error::Result<()> {
//! let trainer = Trainer::new(TrainerConfig::default())?;
//! let outcome = trainer.train_and_save(&CorpusDefinition::default(), "models/intent_model.bin")?;
//! println!("{}", outcome.report);
//!
//! let intent = outcome.model.predict("Parle moi de Carthage")?;
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod corpus;
pub mod intent;
pub mod metrics;
pub mod naive_bayes;
pub mod tfidf;
pub mod trainer;

pub use classifier::{ClassifierState, IntentClassifier, IntentModel};
pub use corpus::{CorpusDefinition, IntentSample, VocabularyEntry};
pub use intent::Intent;
pub use metrics::ClassificationReport;
pub use trainer::{Trainer, TrainerConfig, TrainingOutcome, TrainingSummary};
