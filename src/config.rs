//! Application configuration.
//!
//! Values come from an optional JSON file; the command line overrides
//! individual fields after loading.
//!
//! ```json
//! {
//!   "model_path": "models/intent_model.bin",
//!   "knowledge_base_path": "data/knowledge_base.json",
//!   "trainer": { "seed": 42, "test_ratio": 0.2, "alpha": 0.1 }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::ml::corpus::CorpusDefinition;
use crate::ml::trainer::TrainerConfig;

/// Default location of the trained model artifact.
pub const DEFAULT_MODEL_PATH: &str = "models/intent_model.bin";

/// Configuration shared by the trainer and the query-time components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the trainer writes, and the retriever reads, the model artifact.
    pub model_path: PathBuf,
    /// JSON knowledge base replacing the built-in one.
    pub knowledge_base_path: Option<PathBuf>,
    /// JSON corpus definition replacing the built-in vocabulary and templates.
    pub corpus_path: Option<PathBuf>,
    /// Training parameters.
    pub trainer: TrainerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            knowledge_base_path: None,
            corpus_path: None,
            trainer: TrainerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load and validate a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.trainer.validate()
    }

    /// The configured knowledge base, or the built-in one.
    pub fn knowledge_base(&self) -> Result<KnowledgeBase> {
        match &self.knowledge_base_path {
            Some(path) => KnowledgeBase::load(path),
            None => Ok(KnowledgeBase::default()),
        }
    }

    /// The configured corpus definition, or the built-in one.
    pub fn corpus(&self) -> Result<CorpusDefinition> {
        match &self.corpus_path {
            Some(path) => CorpusDefinition::load(path),
            None => Ok(CorpusDefinition::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.model_path, PathBuf::from("models/intent_model.bin"));
        assert_eq!(config.trainer.seed, 42);
        assert_eq!(config.trainer.test_ratio, 0.2);
        assert_eq!(config.trainer.alpha, 0.1);
        assert_eq!(config.knowledge_base().unwrap().len(), 4);
        assert_eq!(config.corpus().unwrap(), CorpusDefinition::default());
    }

    #[test]
    fn test_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"model_path": "/tmp/model.bin", "trainer": {{"seed": 7}}}}"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.model_path, PathBuf::from("/tmp/model.bin"));
        assert_eq!(config.trainer.seed, 7);
        assert_eq!(config.trainer.alpha, 0.1);
        assert_eq!(config.trainer.analyzer.max_gram, 2);
    }

    #[test]
    fn test_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"trainer": {{"test_ratio": 2.0}}}}"#).unwrap();
        assert!(AppConfig::load(file.path()).is_err());
    }
}
