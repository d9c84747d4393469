//! Offline training pipeline for the intent classifier.
//!
//! ```text
//! CorpusDefinition ─synthesize→ samples ─shuffle(seed)→ ─split(ratio, seed)→ train / test
//!        train ─fit→ IntentModel ─predict(test)→ ClassificationReport
//!        IntentModel ─save→ artifact
//! ```
//!
//! The report is informational only: no accuracy threshold gates the save.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::AnalyzerConfig;
use crate::error::{NomadiaError, Result};
use crate::ml::classifier::{IntentClassifier, IntentModel};
use crate::ml::corpus::{self, CorpusDefinition};
use crate::ml::intent::Intent;
use crate::ml::metrics::ClassificationReport;

/// Configuration of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Seed for the corpus shuffle and the train/test permutation.
    pub seed: u64,
    /// Fraction of the corpus held out for evaluation.
    pub test_ratio: f64,
    /// Additive smoothing constant of the naive Bayes classifier.
    pub alpha: f64,
    /// Feature extraction pipeline.
    pub analyzer: AnalyzerConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_ratio: 0.2,
            alpha: 0.1,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl TrainerConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(NomadiaError::invalid_config(format!(
                "test_ratio must be in (0, 1), got {}",
                self.test_ratio
            )));
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(NomadiaError::invalid_config(format!(
                "alpha must be a positive number, got {}",
                self.alpha
            )));
        }
        self.analyzer.validate()
    }
}

/// Figures describing a finished training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub corpus_size: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub vocabulary_size: usize,
    pub classes: Vec<Intent>,
    pub accuracy: f64,
}

/// A fitted model with its evaluation.
#[derive(Debug)]
pub struct TrainingOutcome {
    pub model: IntentModel,
    pub report: ClassificationReport,
    pub summary: TrainingSummary,
}

/// Trains intent classifiers from synthetic corpora.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    /// Create a trainer, validating its configuration.
    pub fn new(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this trainer runs with.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Synthesize, split, fit and evaluate.
    ///
    /// Fails before fitting when the definition yields no samples.
    pub fn train(&self, definition: &CorpusDefinition) -> Result<TrainingOutcome> {
        let mut samples = definition.synthesize()?;
        if samples.is_empty() {
            return Err(NomadiaError::corpus(
                "empty training corpus: the vocabulary table or the template set is empty",
            ));
        }
        let corpus_size = samples.len();
        info!("Generated {corpus_size} synthetic samples");

        corpus::shuffle(&mut samples, self.config.seed);
        let split = corpus::train_test_split(samples, self.config.test_ratio, self.config.seed)?;
        info!(
            "Split corpus into {} training and {} test samples",
            split.train.len(),
            split.test.len()
        );

        let model = IntentModel::fit(&split.train, self.config.analyzer.clone(), self.config.alpha)?;
        info!(
            "Fitted intent model: {} features, classes {:?}",
            model.vocabulary_size(),
            model.classes()
        );

        let y_true: Vec<Intent> = split.test.iter().map(|s| s.intent).collect();
        let y_pred = split
            .test
            .iter()
            .map(|s| model.predict(&s.text))
            .collect::<Result<Vec<Intent>>>()?;
        let report = ClassificationReport::new(&y_true, &y_pred);
        info!("Model accuracy: {:.2}%", report.accuracy * 100.0);

        let summary = TrainingSummary {
            corpus_size,
            train_size: split.train.len(),
            test_size: split.test.len(),
            vocabulary_size: model.vocabulary_size(),
            classes: model.classes().to_vec(),
            accuracy: report.accuracy,
        };

        Ok(TrainingOutcome {
            model,
            report,
            summary,
        })
    }

    /// Train and persist the model artifact at `path`.
    pub fn train_and_save<P: AsRef<Path>>(
        &self,
        definition: &CorpusDefinition,
        path: P,
    ) -> Result<TrainingOutcome> {
        let outcome = self.train(definition)?;
        outcome.model.save(path.as_ref())?;
        info!("Saved intent model to {}", path.as_ref().display());
        Ok(outcome)
    }
}
