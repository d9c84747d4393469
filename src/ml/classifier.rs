//! Intent classifiers and the persisted model artifact.
//!
//! [`IntentModel`] is the fitted TF-IDF + naive Bayes pipeline. It is written
//! once by the trainer and loaded once at startup into a [`ClassifierState`],
//! which makes the "no model" case an explicit value instead of an error the
//! retriever would have to catch.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::AnalyzerConfig;
use crate::error::{NomadiaError, Result};
use crate::ml::corpus::IntentSample;
use crate::ml::intent::Intent;
use crate::ml::naive_bayes::MultinomialNaiveBayes;
use crate::ml::tfidf::{TfIdfState, TfIdfVectorizer};

/// Version of the on-disk artifact layout.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Intent classifier trait.
///
/// Implementations must be free of interior mutability so that one loaded
/// instance can serve concurrent queries without locking.
pub trait IntentClassifier: Send + Sync {
    /// Predict the intent for a given query.
    ///
    /// Text without any known feature still yields an intent.
    fn predict(&self, query: &str) -> Result<Intent>;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}

#[derive(Serialize, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    vectorizer: TfIdfState,
    naive_bayes: MultinomialNaiveBayes,
}

/// Fitted TF-IDF + multinomial naive Bayes intent classifier.
#[derive(Debug)]
pub struct IntentModel {
    vectorizer: TfIdfVectorizer,
    naive_bayes: MultinomialNaiveBayes,
}

impl IntentModel {
    /// Fit a model on labelled samples.
    pub fn fit(samples: &[IntentSample], analyzer: AnalyzerConfig, alpha: f64) -> Result<Self> {
        if samples.is_empty() {
            return Err(NomadiaError::training("Training samples cannot be empty"));
        }

        let documents: Vec<String> = samples.iter().map(|s| s.text.clone()).collect();
        let labels: Vec<Intent> = samples.iter().map(|s| s.intent).collect();

        let mut vectorizer = TfIdfVectorizer::new(analyzer)?;
        let features = vectorizer.fit_transform(&documents)?;
        let naive_bayes =
            MultinomialNaiveBayes::fit(&features, &labels, vectorizer.vocabulary_size(), alpha)?;

        Ok(Self {
            vectorizer,
            naive_bayes,
        })
    }

    /// Posterior probability of every known intent for a query.
    pub fn predict_proba(&self, query: &str) -> Result<Vec<(Intent, f64)>> {
        let features = self.vectorizer.transform(query)?;
        Ok(self.naive_bayes.predict_proba(&features))
    }

    /// Intents the model can emit.
    pub fn classes(&self) -> &[Intent] {
        self.naive_bayes.classes()
    }

    /// Number of features learned from the training set.
    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary_size()
    }

    /// Serialize the model into its artifact bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let artifact = ModelArtifact {
            format_version: ARTIFACT_FORMAT_VERSION,
            vectorizer: self.vectorizer.state(),
            naive_bayes: self.naive_bayes.clone(),
        };
        Ok(bincode::serialize(&artifact)?)
    }

    /// Rebuild a model from artifact bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let artifact: ModelArtifact = bincode::deserialize(bytes)
            .map_err(|e| NomadiaError::model(format!("corrupt model artifact: {e}")))?;

        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(NomadiaError::model(format!(
                "unsupported artifact format version {} (expected {ARTIFACT_FORMAT_VERSION})",
                artifact.format_version
            )));
        }

        let vectorizer = TfIdfVectorizer::from_state(artifact.vectorizer)?;
        artifact.naive_bayes.validate()?;
        if artifact.naive_bayes.n_features() != vectorizer.vocabulary_size() {
            return Err(NomadiaError::model(
                "classifier and vectorizer disagree on the feature space",
            ));
        }

        Ok(Self {
            vectorizer,
            naive_bayes: artifact.naive_bayes,
        })
    }

    /// Write the artifact to `path`, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Read the artifact at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }
}

impl IntentClassifier for IntentModel {
    fn predict(&self, query: &str) -> Result<Intent> {
        let features = self.vectorizer.transform(query)?;
        Ok(self.naive_bayes.predict(&features))
    }

    fn name(&self) -> &str {
        "tfidf_naive_bayes"
    }
}

/// Outcome of loading the classifier at startup.
#[derive(Clone)]
pub enum ClassifierState {
    /// A usable classifier.
    Loaded(Arc<dyn IntentClassifier>),
    /// No classifier; queries fall back to the `general` intent.
    Unavailable {
        /// Why loading failed, for startup logging.
        reason: String,
    },
}

impl fmt::Debug for ClassifierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierState::Loaded(classifier) => {
                f.debug_tuple("Loaded").field(&classifier.name()).finish()
            }
            ClassifierState::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

impl ClassifierState {
    /// Load the model artifact at `path`.
    ///
    /// Never fails: a missing or corrupt artifact becomes `Unavailable` and is
    /// reported once here.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            let state = Self::unavailable(format!(
                "no model artifact at {}; run `nomadia train` first",
                path.display()
            ));
            state.log();
            return state;
        }

        let state = match IntentModel::load(path) {
            Ok(model) => {
                info!(
                    "Loaded intent model from {} ({} features, classes: {:?})",
                    path.display(),
                    model.vocabulary_size(),
                    model.classes()
                );
                Self::Loaded(Arc::new(model))
            }
            Err(e) => Self::unavailable(format!("failed to load {}: {e}", path.display())),
        };
        state.log();
        state
    }

    /// Wrap an already constructed classifier.
    pub fn loaded(classifier: Arc<dyn IntentClassifier>) -> Self {
        Self::Loaded(classifier)
    }

    /// An unavailable classifier with the given reason.
    pub fn unavailable<S: Into<String>>(reason: S) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// The classifier, if one is loaded.
    pub fn classifier(&self) -> Option<&dyn IntentClassifier> {
        match self {
            Self::Loaded(classifier) => Some(classifier.as_ref()),
            Self::Unavailable { .. } => None,
        }
    }

    /// Whether a classifier is loaded.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    fn log(&self) {
        if let Self::Unavailable { reason } = self {
            warn!("Intent model unavailable, every query will use the general intent: {reason}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::corpus::CorpusDefinition;
    use tempfile::TempDir;

    fn small_model() -> IntentModel {
        let samples = vec![
            IntentSample::new("je veux couscous", Intent::Food),
            IntentSample::new("je veux brik", Intent::Food),
            IntentSample::new("aller à douz", Intent::Geography),
            IntentSample::new("aller au sahara", Intent::Geography),
            IntentSample::new("histoire de hannibal", Intent::History),
            IntentSample::new("bonjour", Intent::General),
        ];
        IntentModel::fit(&samples, AnalyzerConfig::default(), 0.1).unwrap()
    }

    #[test]
    fn test_ml_intent_classifier() {
        let model = small_model();
        assert_eq!(model.predict("un bon couscous").unwrap(), Intent::Food);
        assert_eq!(model.predict("le sahara").unwrap(), Intent::Geography);
        assert_eq!(model.predict("hannibal").unwrap(), Intent::History);
        assert_eq!(model.name(), "tfidf_naive_bayes");
    }

    #[test]
    fn test_out_of_vocabulary_uses_priors() {
        let model = small_model();
        // food and geography tie on priors; the first declared intent wins
        assert_eq!(model.predict("").unwrap(), Intent::Food);
        assert_eq!(model.predict("zzz qqq").unwrap(), Intent::Food);
    }

    #[test]
    fn test_full_corpus_scenarios() {
        let samples = CorpusDefinition::default().synthesize().unwrap();
        let model = IntentModel::fit(&samples, AnalyzerConfig::default(), 0.1).unwrap();
        assert_eq!(model.classes(), &Intent::ALL);
        assert_eq!(
            model.predict("Je veux manger du couscous").unwrap(),
            Intent::Food
        );
        assert_eq!(model.predict("bonjour nomadia").unwrap(), Intent::General);
    }

    #[test]
    fn test_bytes_round_trip() {
        let model = small_model();
        let bytes = model.to_bytes().unwrap();
        let restored = IntentModel::from_bytes(&bytes).unwrap();

        for query in ["couscous", "douz", "hannibal", "", "bonjour"] {
            assert_eq!(
                restored.predict_proba(query).unwrap(),
                model.predict_proba(query).unwrap()
            );
        }
        assert_eq!(restored.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_corrupt_artifact() {
        assert!(matches!(
            IntentModel::from_bytes(&[1, 2, 3]),
            Err(NomadiaError::Model(_))
        ));

        let mut bytes = small_model().to_bytes().unwrap();
        bytes[0] = 99; // format version
        assert!(matches!(
            IntentModel::from_bytes(&bytes),
            Err(NomadiaError::Model(_))
        ));
    }

    #[test]
    fn test_classifier_state_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("models").join("intent_model.bin");

        let state = ClassifierState::load(&path);
        assert!(!state.is_loaded());
        assert!(state.classifier().is_none());
        match &state {
            ClassifierState::Unavailable { reason } => assert!(reason.contains("no model artifact")),
            _ => panic!("Expected Unavailable state"),
        }

        small_model().save(&path).unwrap();
        let state = ClassifierState::load(&path);
        assert!(state.is_loaded());
        assert_eq!(
            state.classifier().unwrap().predict("couscous").unwrap(),
            Intent::Food
        );

        fs::write(&path, b"not a model").unwrap();
        let state = ClassifierState::load(&path);
        assert!(!state.is_loaded());
    }
}
