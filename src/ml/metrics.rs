//! Evaluation metrics for the intent classifier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ml::intent::Intent;

/// Precision, recall and F1 for one class (or an average over classes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of true samples of the class.
    pub support: usize,
}

/// Metrics of one labelled class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentMetrics {
    pub intent: Intent,
    #[serde(flatten)]
    pub metrics: ClassMetrics,
}

/// Accuracy plus a per-class precision/recall/F1 table.
///
/// Undefined ratios (no predictions or no samples for a class) are reported
/// as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub per_class: Vec<IntentMetrics>,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    pub total: usize,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl ClassificationReport {
    /// Build the report from aligned true and predicted labels.
    ///
    /// Classes appearing in either list are reported, in `Intent` order.
    pub fn new(y_true: &[Intent], y_pred: &[Intent]) -> Self {
        let total = y_true.len().min(y_pred.len());
        let pairs: Vec<(Intent, Intent)> = y_true
            .iter()
            .zip(y_pred)
            .map(|(t, p)| (*t, *p))
            .collect();

        let correct = pairs.iter().filter(|(t, p)| t == p).count();
        let accuracy = ratio(correct, total);

        let mut labels: Vec<Intent> = pairs.iter().flat_map(|(t, p)| [*t, *p]).collect();
        labels.sort();
        labels.dedup();

        let per_class: Vec<IntentMetrics> = labels
            .into_iter()
            .map(|intent| {
                let true_positive = pairs.iter().filter(|(t, p)| *t == intent && *p == intent).count();
                let predicted = pairs.iter().filter(|(_, p)| *p == intent).count();
                let support = pairs.iter().filter(|(t, _)| *t == intent).count();

                let precision = ratio(true_positive, predicted);
                let recall = ratio(true_positive, support);
                IntentMetrics {
                    intent,
                    metrics: ClassMetrics {
                        precision,
                        recall,
                        f1: f1(precision, recall),
                        support,
                    },
                }
            })
            .collect();

        let n_classes = per_class.len().max(1) as f64;
        let macro_avg = ClassMetrics {
            precision: per_class.iter().map(|c| c.metrics.precision).sum::<f64>() / n_classes,
            recall: per_class.iter().map(|c| c.metrics.recall).sum::<f64>() / n_classes,
            f1: per_class.iter().map(|c| c.metrics.f1).sum::<f64>() / n_classes,
            support: total,
        };

        let weight = |value: fn(&ClassMetrics) -> f64| {
            if total == 0 {
                0.0
            } else {
                per_class
                    .iter()
                    .map(|c| value(&c.metrics) * c.metrics.support as f64)
                    .sum::<f64>()
                    / total as f64
            }
        };
        let weighted_avg = ClassMetrics {
            precision: weight(|m| m.precision),
            recall: weight(|m| m.recall),
            f1: weight(|m| m.f1),
            support: total,
        };

        Self {
            accuracy,
            per_class,
            macro_avg,
            weighted_avg,
            total,
        }
    }

    /// Metrics of a single class, if it appeared in the evaluation.
    pub fn class(&self, intent: Intent) -> Option<&ClassMetrics> {
        self.per_class
            .iter()
            .find(|c| c.intent == intent)
            .map(|c| &c.metrics)
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>14} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for class in &self.per_class {
            let m = &class.metrics;
            writeln!(
                f,
                "{:>14} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                class.intent.as_str(),
                m.precision,
                m.recall,
                m.f1,
                m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.total
        )?;
        for (name, m) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>14} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let labels = vec![Intent::Food, Intent::History, Intent::Food];
        let report = ClassificationReport::new(&labels, &labels);
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.total, 3);
        let food = report.class(Intent::Food).unwrap();
        assert_eq!(food.precision, 1.0);
        assert_eq!(food.recall, 1.0);
        assert_eq!(food.support, 2);
    }

    #[test]
    fn test_mixed_predictions() {
        let y_true = vec![Intent::Food, Intent::Food, Intent::Geography, Intent::General];
        let y_pred = vec![Intent::Food, Intent::Geography, Intent::Geography, Intent::Food];
        let report = ClassificationReport::new(&y_true, &y_pred);

        assert!((report.accuracy - 0.5).abs() < 1e-12);

        let food = report.class(Intent::Food).unwrap();
        assert!((food.precision - 0.5).abs() < 1e-12);
        assert!((food.recall - 0.5).abs() < 1e-12);

        let geography = report.class(Intent::Geography).unwrap();
        assert!((geography.precision - 0.5).abs() < 1e-12);
        assert!((geography.recall - 1.0).abs() < 1e-12);
        assert!((geography.f1 - 2.0 / 3.0).abs() < 1e-12);

        let general = report.class(Intent::General).unwrap();
        assert_eq!(general.precision, 0.0);
        assert_eq!(general.f1, 0.0);

        assert!(report.class(Intent::History).is_none());
        assert_eq!(report.per_class.len(), 3);
    }

    #[test]
    fn test_weighted_average_uses_support() {
        let y_true = vec![Intent::Food, Intent::Food, Intent::Food, Intent::History];
        let y_pred = vec![Intent::Food, Intent::Food, Intent::Food, Intent::Food];
        let report = ClassificationReport::new(&y_true, &y_pred);

        // food recall 1.0 (support 3), history recall 0.0 (support 1)
        assert!((report.weighted_avg.recall - 0.75).abs() < 1e-12);
        assert!((report.macro_avg.recall - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_display_lists_every_class() {
        let y_true = vec![Intent::Food, Intent::History];
        let report = ClassificationReport::new(&y_true, &y_true);
        let text = report.to_string();
        assert!(text.contains("food"));
        assert!(text.contains("history"));
        assert!(text.contains("accuracy"));
        assert!(text.contains("weighted avg"));
    }

    #[test]
    fn test_empty_evaluation() {
        let report = ClassificationReport::new(&[], &[]);
        assert_eq!(report.accuracy, 0.0);
        assert!(report.per_class.is_empty());
    }
}
