//! The closed set of intents a query can be classified into.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NomadiaError, Result};

/// Topic of a travel question.
///
/// `General` doubles as the retrieval wildcard: a query resolved to `General`
/// selects every knowledge base entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Dishes, restaurants, recipes.
    Food,
    /// Places, sites, landscapes.
    Geography,
    /// Antiquity, monuments, heritage.
    History,
    /// Greetings, help, anything else.
    General,
}

impl Intent {
    /// Every intent, in declaration order.
    pub const ALL: [Intent; 4] = [
        Intent::Food,
        Intent::Geography,
        Intent::History,
        Intent::General,
    ];

    /// The lowercase label of this intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Food => "food",
            Intent::Geography => "geography",
            Intent::History => "history",
            Intent::General => "general",
        }
    }

    /// Whether this intent selects every knowledge base entry.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Intent::General)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = NomadiaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "food" => Ok(Intent::Food),
            "geography" => Ok(Intent::Geography),
            "history" => Ok(Intent::History),
            "general" => Ok(Intent::General),
            other => Err(NomadiaError::other(format!("Unknown intent: {other}"))),
        }
    }
}
