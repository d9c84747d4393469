//! Synthetic training corpus for the intent classifier.
//!
//! Training data is generated rather than collected: every keyword of the
//! vocabulary table is substituted into every sentence template, once verbatim
//! and once lower-cased. Repeated `(text, intent)` pairs are kept on purpose,
//! they weight frequent phrasings more heavily.

use std::fs;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{NomadiaError, Result};
use crate::ml::intent::Intent;

/// Substitution slot inside a template.
pub const TEMPLATE_SLOT: &str = "{}";

/// Training sample for intent classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentSample {
    /// Query text.
    pub text: String,
    /// Intent label.
    pub intent: Intent,
}

impl IntentSample {
    /// Create a new sample.
    pub fn new<S: Into<String>>(text: S, intent: Intent) -> Self {
        Self {
            text: text.into(),
            intent,
        }
    }
}

/// Keywords that characterize one intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Intent the keywords belong to.
    pub intent: Intent,
    /// Ordered keywords and short phrases.
    pub keywords: Vec<String>,
}

impl VocabularyEntry {
    fn new(intent: Intent, keywords: &[&str]) -> Self {
        Self {
            intent,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Vocabulary table and template set the corpus is synthesized from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusDefinition {
    /// Intent -> keywords, in declaration order.
    pub vocabulary: Vec<VocabularyEntry>,
    /// Sentence templates, each with exactly one `{}` slot.
    pub templates: Vec<String>,
}

impl Default for CorpusDefinition {
    fn default() -> Self {
        let vocabulary = vec![
            VocabularyEntry::new(
                Intent::Food,
                &[
                    "couscous", "brik", "lablabi", "makroudh", "manger", "restaurant", "plat",
                    "cuisine", "thé", "pignons", "faim", "recette", "slata", "ojja",
                ],
            ),
            VocabularyEntry::new(
                Intent::Geography,
                &[
                    "carthage", "sidi bou said", "douz", "sahara", "el jem", "kairouan",
                    "bardo", "tunis", "hammamet", "sousse", "djerba", "mosquée", "musée",
                    "désert", "plage", "gps",
                ],
            ),
            VocabularyEntry::new(
                Intent::History,
                &[
                    "histoire", "antique", "romain", "phénicien", "ruines", "monument",
                    "fondation", "hannibal", "reine didon", "guerre", "patrimoine", "unesco",
                    "bey", "date",
                ],
            ),
            VocabularyEntry::new(
                Intent::General,
                &[
                    "bonjour", "salut", "merci", "aurevoir", "ça va", "aide", "nomadia",
                    "hello", "guide", "bot", "qui es tu",
                ],
            ),
        ];

        let templates = [
            "{}",
            "Je veux {}",
            "Parle moi de {}",
            "C'est quoi {}",
            "Où trouver {}",
            "J'aime {}",
            "Donne des infos sur {}",
            "Quelle est l'histoire de {}",
            "Aller à {}",
        ]
        .iter()
        .map(|t| t.to_string())
        .collect();

        Self {
            vocabulary,
            templates,
        }
    }
}

impl CorpusDefinition {
    /// Load a corpus definition from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let definition: CorpusDefinition = serde_json::from_str(&content)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Check that every template carries exactly one substitution slot.
    pub fn validate(&self) -> Result<()> {
        for template in &self.templates {
            let slots = template.matches(TEMPLATE_SLOT).count();
            if slots != 1 {
                return Err(NomadiaError::corpus(format!(
                    "template {template:?} must contain exactly one {TEMPLATE_SLOT} slot, found {slots}"
                )));
            }
        }
        Ok(())
    }

    /// Total number of keywords across all intents.
    pub fn keyword_count(&self) -> usize {
        self.vocabulary.iter().map(|e| e.keywords.len()).sum()
    }

    /// Generate the full keyword × template × case-variant cross product.
    ///
    /// An empty vocabulary or template set yields an empty corpus; rejecting
    /// it is the trainer's job.
    pub fn synthesize(&self) -> Result<Vec<IntentSample>> {
        self.validate()?;

        let mut samples = Vec::with_capacity(self.keyword_count() * self.templates.len() * 2);
        for entry in &self.vocabulary {
            for keyword in &entry.keywords {
                for template in &self.templates {
                    let text = template.replacen(TEMPLATE_SLOT, keyword, 1);
                    let lowered = text.to_lowercase();
                    samples.push(IntentSample::new(text, entry.intent));
                    samples.push(IntentSample::new(lowered, entry.intent));
                }
            }
        }

        Ok(samples)
    }
}

/// Held-out partition of a shuffled corpus.
#[derive(Debug, Clone)]
pub struct CorpusSplit {
    /// Samples the classifier is fitted on.
    pub train: Vec<IntentSample>,
    /// Samples the classifier is evaluated on.
    pub test: Vec<IntentSample>,
}

/// Shuffle samples in place with a seeded generator.
pub fn shuffle(samples: &mut [IntentSample], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);
}

/// Partition samples into train and test sets.
///
/// A seeded permutation assigns the first `ceil(test_ratio * n)` positions to
/// the test set and the rest to the train set.
pub fn train_test_split(
    samples: Vec<IntentSample>,
    test_ratio: f64,
    seed: u64,
) -> Result<CorpusSplit> {
    if samples.is_empty() {
        return Err(NomadiaError::corpus("cannot split an empty corpus"));
    }
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(NomadiaError::invalid_config(format!(
            "test_ratio must be in (0, 1), got {test_ratio}"
        )));
    }

    let n_samples = samples.len();
    let n_test = (test_ratio * n_samples as f64).ceil() as usize;
    if n_test >= n_samples {
        return Err(NomadiaError::training(format!(
            "a test ratio of {test_ratio} leaves no training samples out of {n_samples}"
        )));
    }

    let mut permutation: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    permutation.shuffle(&mut rng);

    let mut slots: Vec<Option<IntentSample>> = samples.into_iter().map(Some).collect();
    let mut take = |idx: usize| slots[idx].take();

    let test: Vec<IntentSample> = permutation[..n_test].iter().filter_map(|&i| take(i)).collect();
    let train: Vec<IntentSample> = permutation[n_test..].iter().filter_map(|&i| take(i)).collect();

    Ok(CorpusSplit { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_corpus_size() {
        let definition = CorpusDefinition::default();
        assert_eq!(definition.keyword_count(), 55);
        assert_eq!(definition.templates.len(), 9);

        let samples = definition.synthesize().unwrap();
        assert_eq!(samples.len(), 55 * 9 * 2);
    }

    #[test]
    fn test_verbatim_and_lowercase_variants() {
        let definition = CorpusDefinition {
            vocabulary: vec![VocabularyEntry::new(Intent::Food, &["Brik"])],
            templates: vec!["Je veux {}".to_string()],
        };
        let samples = definition.synthesize().unwrap();
        assert_eq!(
            samples,
            vec![
                IntentSample::new("Je veux Brik", Intent::Food),
                IntentSample::new("je veux brik", Intent::Food),
            ]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let samples = CorpusDefinition::default().synthesize().unwrap();
        let bare = samples
            .iter()
            .filter(|s| s.text == "couscous" && s.intent == Intent::Food)
            .count();
        assert_eq!(bare, 2);
    }

    #[test]
    fn test_empty_vocabulary_degenerates_to_empty_corpus() {
        let definition = CorpusDefinition {
            vocabulary: Vec::new(),
            templates: vec!["{}".to_string()],
        };
        assert!(definition.synthesize().unwrap().is_empty());
    }

    #[test]
    fn test_template_slot_validation() {
        let mut definition = CorpusDefinition::default();
        definition.templates.push("no slot here".to_string());
        assert!(matches!(definition.synthesize(), Err(NomadiaError::Corpus(_))));

        definition.templates.pop();
        definition.templates.push("{} et {}".to_string());
        assert!(definition.validate().is_err());
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let samples = CorpusDefinition::default().synthesize().unwrap();

        let mut a = samples.clone();
        let mut b = samples.clone();
        shuffle(&mut a, 42);
        shuffle(&mut b, 42);
        assert_eq!(a, b);
        assert_ne!(a, samples);
    }

    #[test]
    fn test_split_sizes_and_determinism() {
        let samples = CorpusDefinition::default().synthesize().unwrap();

        let split = train_test_split(samples.clone(), 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 198);
        assert_eq!(split.train.len(), 792);

        let again = train_test_split(samples, 0.2, 42).unwrap();
        assert_eq!(split.train, again.train);
        assert_eq!(split.test, again.test);
    }

    #[test]
    fn test_split_rejects_degenerate_input() {
        assert!(train_test_split(Vec::new(), 0.2, 42).is_err());

        let one = vec![IntentSample::new("brik", Intent::Food)];
        assert!(train_test_split(one.clone(), 0.2, 42).is_err());
        assert!(train_test_split(one, 1.5, 42).is_err());
    }
}
