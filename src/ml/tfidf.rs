//! TF-IDF vectorizer for text feature extraction.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, AnalyzerConfig};
use crate::error::{NomadiaError, Result};

/// Sparse feature vector: `(feature index, weight)` pairs sorted by index.
pub type SparseVector = Vec<(usize, f64)>;

/// TF-IDF vectorizer for text feature extraction.
///
/// Terms are assigned feature indices in sorted order, so two fits over the
/// same documents always produce the same mapping. Terms unseen during `fit`
/// are ignored by `transform`.
pub struct TfIdfVectorizer {
    /// Pipeline description, persisted with the model.
    config: AnalyzerConfig,
    /// Vocabulary: term -> index mapping.
    vocabulary: BTreeMap<String, usize>,
    /// Inverse document frequency for each term.
    idf: Vec<f64>,
    /// Total number of documents seen during training.
    n_documents: usize,
    /// Analyzer built from `config`.
    analyzer: Arc<dyn Analyzer>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

/// Serializable state of a fitted vectorizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfState {
    pub analyzer: AnalyzerConfig,
    pub vocabulary: BTreeMap<String, usize>,
    pub idf: Vec<f64>,
    pub n_documents: usize,
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer with the given analysis pipeline.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        let analyzer = config.build()?;
        Ok(Self {
            config,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
            n_documents: 0,
            analyzer,
        })
    }

    /// Rebuild a fitted vectorizer from its persisted state.
    pub fn from_state(state: TfIdfState) -> Result<Self> {
        if state.idf.len() != state.vocabulary.len() {
            return Err(NomadiaError::model(format!(
                "vectorizer has {} terms but {} idf weights",
                state.vocabulary.len(),
                state.idf.len()
            )));
        }
        if state.vocabulary.values().any(|&idx| idx >= state.idf.len()) {
            return Err(NomadiaError::model("vectorizer feature index out of range"));
        }

        let analyzer = state.analyzer.build()?;
        Ok(Self {
            config: state.analyzer,
            vocabulary: state.vocabulary,
            idf: state.idf,
            n_documents: state.n_documents,
            analyzer,
        })
    }

    /// Snapshot the fitted state for persistence.
    pub fn state(&self) -> TfIdfState {
        TfIdfState {
            analyzer: self.config.clone(),
            vocabulary: self.vocabulary.clone(),
            idf: self.idf.clone(),
            n_documents: self.n_documents,
        }
    }

    /// Fit the vectorizer on training documents.
    ///
    /// Fails when the documents produce no terms at all.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();

        for doc in documents {
            let unique_terms: BTreeSet<String> = self.terms(doc)?.into_iter().collect();
            for term in unique_terms {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(NomadiaError::training(
                "empty vocabulary: the training documents contain no usable terms",
            ));
        }

        let n_documents = documents.len();
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(document_frequency.len());

        for (idx, (term, df)) in document_frequency.into_iter().enumerate() {
            // IDF = ln((N + 1) / (df + 1)) + 1
            idf.push(((n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0);
            vocabulary.insert(term, idx);
        }

        self.vocabulary = vocabulary;
        self.idf = idf;
        self.n_documents = n_documents;

        Ok(())
    }

    /// Transform a document into an L2-normalized TF-IDF vector.
    ///
    /// A document without known terms maps to the empty vector.
    pub fn transform(&self, document: &str) -> Result<SparseVector> {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.terms(document)? {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut features: SparseVector = counts
            .into_iter()
            .map(|(idx, count)| (idx, count * self.idf[idx]))
            .collect();

        let norm = features.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, weight) in &mut features {
                *weight /= norm;
            }
        }

        Ok(features)
    }

    /// Fit on the documents and return their feature vectors.
    pub fn fit_transform(&mut self, documents: &[String]) -> Result<Vec<SparseVector>> {
        self.fit(documents)?;
        documents.iter().map(|doc| self.transform(doc)).collect()
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of documents the vectorizer was fitted on.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Feature index of a term, if it was seen during training.
    pub fn feature_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    fn terms(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyzer.analyze(text)?.map(|token| token.text).collect())
    }
}
