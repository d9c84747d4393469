//! Static knowledge base used to ground generated answers.
//!
//! The base is built once at startup and shared read-only; nothing in the
//! crate mutates it afterwards.

pub mod retriever;

pub use retriever::{ContextRetriever, IntentResolution, Retrieval};

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NomadiaError, Result};
use crate::ml::intent::Intent;

/// One curated topic record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Unique identifier, also the `SUJET` of the context block.
    pub id: String,
    /// Intent this entry answers.
    pub category: Intent,
    /// Substrings that select the entry regardless of the predicted intent.
    pub keywords: Vec<String>,
    /// Free text handed to the language model.
    pub content: String,
    /// Image URIs or public paths.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// `"lat, lng"` as written by the curator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<String>,
}

impl KnowledgeEntry {
    /// Create an entry without images or coordinates.
    pub fn new<S: Into<String>>(id: S, category: Intent, keywords: &[&str], content: S) -> Self {
        Self {
            id: id.into(),
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            content: content.into(),
            images: Vec::new(),
            coordinates: None,
        }
    }

    /// Attach images.
    pub fn with_images(mut self, images: &[&str]) -> Self {
        self.images = images.iter().map(|i| i.to_string()).collect();
        self
    }

    /// Attach coordinates.
    pub fn with_coordinates<S: Into<String>>(mut self, coordinates: S) -> Self {
        self.coordinates = Some(coordinates.into());
        self
    }

    /// Whether any keyword occurs in the query, ignoring case.
    ///
    /// `lowered_query` must already be lower-cased.
    pub fn matches_keyword(&self, lowered_query: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowered_query.contains(&keyword.to_lowercase()))
    }

    /// The context block of this entry.
    pub fn info_block(&self) -> String {
        let mut info = format!("SUJET: {}\nINFO: {}", self.id, self.content);
        if !self.images.is_empty() {
            info.push_str("\nIMAGES: ");
            info.push_str(&self.images.join(", "));
        }
        if let Some(coordinates) = &self.coordinates {
            info.push_str("\nGPS: ");
            info.push_str(coordinates);
        }
        info
    }
}

/// Ordered, immutable collection of entries with unique ids.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Build a knowledge base, rejecting duplicate ids and blank keywords.
    pub fn new(entries: Vec<KnowledgeEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.id.trim().is_empty() {
                return Err(NomadiaError::knowledge_base("entry id cannot be empty"));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(NomadiaError::knowledge_base(format!(
                    "duplicate entry id {:?}",
                    entry.id
                )));
            }
            if entry.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(NomadiaError::knowledge_base(format!(
                    "entry {:?} has a blank keyword",
                    entry.id
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Load a knowledge base from a JSON array of entries.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let entries: Vec<KnowledgeEntry> = serde_json::from_str(&content)?;
        Self::new(entries)
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// Iterate over entries in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, KnowledgeEntry> {
        self.entries.iter()
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&KnowledgeEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self {
            entries: vec![
                KnowledgeEntry::new(
                    "food",
                    Intent::Food,
                    &["manger", "couscous", "brik"],
                    "La cuisine tunisienne : Couscous, Brik, Lablabi.",
                )
                .with_images(&["public/couscous-viande_0.jpg"]),
                KnowledgeEntry::new(
                    "sidi_bou",
                    Intent::Geography,
                    &["sidi bou said", "bleu"],
                    "Sidi Bou Saïd, le village bleu et blanc.",
                )
                .with_images(&[
                    "https://images.unsplash.com/photo-1566903253360-1283d5a80b15?w=600",
                ])
                .with_coordinates("36.8703, 10.3421"),
                KnowledgeEntry::new(
                    "carthage",
                    Intent::History,
                    &["carthage", "hannibal"],
                    "Carthage antique, fondée en 814 av JC.",
                )
                .with_images(&[
                    "https://images.unsplash.com/photo-1669049488330-9759392e2124?w=600",
                ])
                .with_coordinates("36.8525, 10.3238"),
                KnowledgeEntry::new(
                    "sahara",
                    Intent::Geography,
                    &["sahara", "douz"],
                    "Le grand désert du Sahara au sud.",
                )
                .with_images(&["https://images.unsplash.com/photo-1542052683-9b63a948480d?w=600"])
                .with_coordinates("33.4667, 9.0167"),
            ],
        }
    }
}

impl<'a> IntoIterator for &'a KnowledgeBase {
    type Item = &'a KnowledgeEntry;
    type IntoIter = std::slice::Iter<'a, KnowledgeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
