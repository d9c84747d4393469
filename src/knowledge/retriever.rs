//! Context retrieval: intent resolution, entry selection and serialization.
//!
//! An entry is selected when **any** of these holds:
//!
//! - the resolved intent is `general` (wildcard),
//! - the entry's category equals the resolved intent,
//! - one of the entry's keywords occurs in the query, ignoring case.
//!
//! Selected entries keep knowledge base order; nothing is scored, ranked or
//! deduplicated. Retrieval never fails: classifier problems degrade the
//! resolution instead of surfacing as errors.

use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;

use crate::knowledge::{KnowledgeBase, KnowledgeEntry};
use crate::ml::classifier::{ClassifierState, IntentClassifier};
use crate::ml::intent::Intent;

/// Line placed between two serialized entries.
pub const BLOCK_SEPARATOR: &str = "\n---\n";

/// How the intent of a query was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentResolution {
    /// The classifier predicted this intent.
    Predicted(Intent),
    /// No classifier, or a blank query: the `general` wildcard applies.
    Wildcard,
    /// The classifier failed on this query: only keywords select entries.
    KeywordOnly,
}

impl IntentResolution {
    /// The category used by the selection policy, if any.
    pub fn category(&self) -> Option<Intent> {
        match self {
            IntentResolution::Predicted(intent) => Some(*intent),
            IntentResolution::Wildcard => Some(Intent::General),
            IntentResolution::KeywordOnly => None,
        }
    }
}

/// Full outcome of a retrieval, for diagnostics and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Retrieval {
    pub resolution: IntentResolution,
    /// Ids of the selected entries, in knowledge base order.
    pub matched: Vec<String>,
    /// The grounding context handed to prompt construction.
    pub context: String,
}

/// Decide the intent of a query.
///
/// A blank query is never classified: with no features the model would only
/// report its largest class prior, so it resolves to the wildcard and selects
/// the whole base instead.
pub fn resolve_intent(query: &str, classifier: Option<&dyn IntentClassifier>) -> IntentResolution {
    let Some(classifier) = classifier else {
        return IntentResolution::Wildcard;
    };
    if query.trim().is_empty() {
        return IntentResolution::Wildcard;
    }

    match classifier.predict(query) {
        Ok(intent) => {
            debug!("Predicted category: {}", intent.as_str().to_uppercase());
            IntentResolution::Predicted(intent)
        }
        Err(e) => {
            warn!(
                "Intent classifier {} failed, using keyword matching only: {e}",
                classifier.name()
            );
            IntentResolution::KeywordOnly
        }
    }
}

/// Entries selected for a query under a category, in knowledge base order.
pub fn select<'a>(
    query: &str,
    category: Option<Intent>,
    knowledge_base: &'a KnowledgeBase,
) -> Vec<&'a KnowledgeEntry> {
    let lowered_query = query.to_lowercase();
    knowledge_base
        .iter()
        .filter(|entry| match category {
            Some(Intent::General) => true,
            Some(intent) if entry.category == intent => true,
            _ => entry.matches_keyword(&lowered_query),
        })
        .collect()
}

/// Join the info blocks of the entries; no entries yield an empty string.
pub fn serialize_context(entries: &[&KnowledgeEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.info_block())
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Resolve, select and serialize in one step.
pub fn retrieve_detailed(
    query: &str,
    classifier: Option<&dyn IntentClassifier>,
    knowledge_base: &KnowledgeBase,
) -> Retrieval {
    let resolution = resolve_intent(query, classifier);
    let selected = select(query, resolution.category(), knowledge_base);

    Retrieval {
        resolution,
        matched: selected.iter().map(|entry| entry.id.clone()).collect(),
        context: serialize_context(&selected),
    }
}

/// The grounding context for a query.
pub fn retrieve(
    query: &str,
    classifier: Option<&dyn IntentClassifier>,
    knowledge_base: &KnowledgeBase,
) -> String {
    retrieve_detailed(query, classifier, knowledge_base).context
}

/// Startup-built pairing of a knowledge base with the classifier state.
///
/// Cheap to clone and safe to share between concurrently handled queries.
#[derive(Debug, Clone)]
pub struct ContextRetriever {
    knowledge_base: Arc<KnowledgeBase>,
    classifier: ClassifierState,
}

impl ContextRetriever {
    /// Create a retriever over a knowledge base.
    pub fn new(knowledge_base: Arc<KnowledgeBase>, classifier: ClassifierState) -> Self {
        Self {
            knowledge_base,
            classifier,
        }
    }

    /// The grounding context for a query.
    pub fn retrieve(&self, query: &str) -> String {
        retrieve(query, self.classifier.classifier(), &self.knowledge_base)
    }

    /// Resolution, selected ids and context for a query.
    pub fn retrieve_detailed(&self, query: &str) -> Retrieval {
        retrieve_detailed(query, self.classifier.classifier(), &self.knowledge_base)
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    pub fn classifier_state(&self) -> &ClassifierState {
        &self.classifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NomadiaError, Result};

    /// Classifier that always answers the same intent.
    struct FixedIntent(Intent);

    impl IntentClassifier for FixedIntent {
        fn predict(&self, _query: &str) -> Result<Intent> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// Classifier that always fails.
    struct Broken;

    impl IntentClassifier for Broken {
        fn predict(&self, _query: &str) -> Result<Intent> {
            Err(NomadiaError::analysis("malformed input"))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn ids(retrieval: &Retrieval) -> Vec<&str> {
        retrieval.matched.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_category_match_without_keywords() {
        let base = KnowledgeBase::default();
        let classifier = FixedIntent(Intent::Geography);
        let retrieval = retrieve_detailed("un endroit calme", Some(&classifier), &base);

        assert_eq!(retrieval.resolution, IntentResolution::Predicted(Intent::Geography));
        assert_eq!(ids(&retrieval), vec!["sidi_bou", "sahara"]);
    }

    #[test]
    fn test_keyword_match_across_categories() {
        let base = KnowledgeBase::default();
        let classifier = FixedIntent(Intent::Food);
        let retrieval = retrieve_detailed("un couscous près de Carthage", Some(&classifier), &base);

        assert_eq!(ids(&retrieval), vec!["food", "carthage"]);
    }

    #[test]
    fn test_general_is_a_wildcard() {
        let base = KnowledgeBase::default();
        let classifier = FixedIntent(Intent::General);
        let retrieval = retrieve_detailed("bonjour", Some(&classifier), &base);

        assert_eq!(ids(&retrieval), vec!["food", "sidi_bou", "carthage", "sahara"]);
        assert_eq!(retrieval.context.matches(BLOCK_SEPARATOR).count(), 3);
    }

    #[test]
    fn test_missing_classifier_falls_back_to_general() {
        let base = KnowledgeBase::default();
        let retrieval = retrieve_detailed("couscous", None, &base);

        assert_eq!(retrieval.resolution, IntentResolution::Wildcard);
        assert!(retrieval.context.contains("SUJET: food"));
        assert_eq!(retrieval.matched.len(), base.len());
    }

    #[test]
    fn test_failed_inference_uses_keywords_only() {
        let base = KnowledgeBase::default();
        let retrieval = retrieve_detailed("Un COUSCOUS svp", Some(&Broken), &base);

        assert_eq!(retrieval.resolution, IntentResolution::KeywordOnly);
        assert_eq!(ids(&retrieval), vec!["food"]);

        let retrieval = retrieve_detailed("la météo", Some(&Broken), &base);
        assert!(retrieval.matched.is_empty());
        assert_eq!(retrieval.context, "");
    }

    #[test]
    fn test_no_match_is_empty_context() {
        let base = KnowledgeBase::default();
        let classifier = FixedIntent(Intent::History);
        let base_without_history = KnowledgeBase::new(
            base.iter()
                .filter(|e| e.category != Intent::History)
                .cloned()
                .collect(),
        )
        .unwrap();

        assert_eq!(retrieve("quel temps fait-il", Some(&classifier), &base_without_history), "");
    }

    #[test]
    fn test_blank_query_skips_classification() {
        let base = KnowledgeBase::default();
        let classifier = Broken;
        let retrieval = retrieve_detailed("   ", Some(&classifier), &base);

        assert_eq!(retrieval.resolution, IntentResolution::Wildcard);
        assert_eq!(retrieval.matched.len(), base.len());
    }

    #[test]
    fn test_context_retriever_is_idempotent() {
        let retriever = ContextRetriever::new(
            Arc::new(KnowledgeBase::default()),
            ClassifierState::loaded(Arc::new(FixedIntent(Intent::History))),
        );

        let first = retriever.retrieve("carthage hannibal");
        let second = retriever.retrieve("carthage hannibal");
        assert_eq!(first, second);
        assert!(first.contains("SUJET: carthage"));
        assert!(first.contains("GPS: 36.8525, 10.3238"));
        assert!(!first.contains("SUJET: sahara"));
        assert!(retriever.classifier_state().is_loaded());
    }

    #[test]
    fn test_serialize_context_order_and_separator() {
        let base = KnowledgeBase::default();
        let entries: Vec<&KnowledgeEntry> = vec![
            base.get("sahara").unwrap(),
            base.get("food").unwrap(),
        ];
        let context = serialize_context(&entries);
        let blocks: Vec<_> = context.split(BLOCK_SEPARATOR).collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("SUJET: sahara"));
        assert!(blocks[1].starts_with("SUJET: food"));
        assert_eq!(serialize_context(&[]), "");
    }
}
