//! Multinomial naive Bayes over TF-IDF features.

use serde::{Deserialize, Serialize};

use crate::error::{NomadiaError, Result};
use crate::ml::intent::Intent;
use crate::ml::tfidf::SparseVector;

/// Multinomial naive Bayes classifier with additive (Lidstone) smoothing.
///
/// Only intents present in the training labels become classes. Prediction is
/// the argmax of the joint log likelihood; on ties the class declared first in
/// [`Intent`] wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNaiveBayes {
    /// Additive smoothing constant.
    alpha: f64,
    /// Width of the feature space.
    n_features: usize,
    /// Known classes, in `Intent` order.
    classes: Vec<Intent>,
    /// Training samples per class.
    class_count: Vec<usize>,
    /// `ln P(class)` per class.
    class_log_prior: Vec<f64>,
    /// `ln P(feature | class)`, one row per class.
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNaiveBayes {
    /// Fit the classifier on weighted feature vectors.
    pub fn fit(
        samples: &[SparseVector],
        labels: &[Intent],
        n_features: usize,
        alpha: f64,
    ) -> Result<Self> {
        if samples.is_empty() {
            return Err(NomadiaError::training("Training samples cannot be empty"));
        }
        if samples.len() != labels.len() {
            return Err(NomadiaError::training(format!(
                "{} samples but {} labels",
                samples.len(),
                labels.len()
            )));
        }
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(NomadiaError::invalid_config(format!(
                "alpha must be a positive number, got {alpha}"
            )));
        }
        if n_features == 0 {
            return Err(NomadiaError::training("feature space is empty"));
        }

        let mut classes: Vec<Intent> = labels.to_vec();
        classes.sort();
        classes.dedup();

        let mut class_count = vec![0usize; classes.len()];
        let mut feature_count = vec![vec![0.0f64; n_features]; classes.len()];

        for (features, label) in samples.iter().zip(labels) {
            // `classes` was built from `labels`, so the lookup always succeeds.
            let Ok(class_idx) = classes.binary_search(label) else {
                continue;
            };
            class_count[class_idx] += 1;
            for &(feature_idx, weight) in features {
                if feature_idx < n_features {
                    feature_count[class_idx][feature_idx] += weight;
                }
            }
        }

        let total = samples.len() as f64;
        let class_log_prior = class_count
            .iter()
            .map(|&count| (count as f64 / total).ln())
            .collect();

        let feature_log_prob = feature_count
            .into_iter()
            .map(|counts| {
                let smoothed_total: f64 = counts.iter().sum::<f64>() + alpha * n_features as f64;
                counts
                    .into_iter()
                    .map(|count| ((count + alpha) / smoothed_total).ln())
                    .collect()
            })
            .collect();

        Ok(Self {
            alpha,
            n_features,
            classes,
            class_count,
            class_log_prior,
            feature_log_prob,
        })
    }

    /// Check the internal consistency of deserialized parameters.
    pub fn validate(&self) -> Result<()> {
        let n_classes = self.classes.len();
        if n_classes == 0 {
            return Err(NomadiaError::model("classifier has no classes"));
        }
        if self.class_log_prior.len() != n_classes
            || self.class_count.len() != n_classes
            || self.feature_log_prob.len() != n_classes
        {
            return Err(NomadiaError::model("classifier parameter shapes disagree"));
        }
        if self
            .feature_log_prob
            .iter()
            .any(|row| row.len() != self.n_features)
        {
            return Err(NomadiaError::model(
                "classifier feature rows do not match the feature space",
            ));
        }
        Ok(())
    }

    /// Unnormalized `ln P(class) + Σ x_j ln P(j | class)` for every class.
    pub fn joint_log_likelihood(&self, features: &SparseVector) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_prob)| {
                prior
                    + features
                        .iter()
                        .filter(|(idx, _)| *idx < self.n_features)
                        .map(|&(idx, weight)| weight * log_prob[idx])
                        .sum::<f64>()
            })
            .collect()
    }

    /// Most probable class; with no known features this is the largest prior.
    pub fn predict(&self, features: &SparseVector) -> Intent {
        let scores = self.joint_log_likelihood(features);
        let mut best = 0;
        for (idx, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = idx;
            }
        }
        self.classes[best]
    }

    /// Posterior probability of every class, in class order.
    pub fn predict_proba(&self, features: &SparseVector) -> Vec<(Intent, f64)> {
        let scores = self.joint_log_likelihood(features);
        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let sum: f64 = exp.iter().sum();

        self.classes
            .iter()
            .zip(exp)
            .map(|(intent, e)| (*intent, e / sum))
            .collect()
    }

    /// Known classes, in `Intent` order.
    pub fn classes(&self) -> &[Intent] {
        &self.classes
    }

    /// Training samples seen per class.
    pub fn class_count(&self) -> &[usize] {
        &self.class_count
    }

    /// Additive smoothing constant.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Width of the feature space.
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}
