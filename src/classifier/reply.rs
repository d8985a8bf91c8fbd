//! Interpretation of classifier replies
//!
//! Models answer with JSON, sometimes wrapped in prose or code fences. Two
//! verdict schemas are accepted: the detailed per-category schema the prompt
//! asks for, and a plain `{status, reason}` schema.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::rules::Category;

/// First `{` to last `}`, across lines
static JSON_FRAGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The classifier's view of one category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryAssessment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub flagged: bool,

    /// 0.0 to 1.0
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub evidence: Vec<String>,
}

/// Per-category schema with an overall violation flag
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetailedVerdict {
    #[serde(default)]
    pub hate_speech: Option<CategoryAssessment>,
    #[serde(default)]
    pub profanity: Option<CategoryAssessment>,
    #[serde(default)]
    pub spam: Option<CategoryAssessment>,
    #[serde(default)]
    pub harassment: Option<CategoryAssessment>,
    pub violation: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
}

impl DetailedVerdict {
    /// Categories the classifier reported on, keyed by category
    pub fn categories(&self) -> BTreeMap<Category, CategoryAssessment> {
        [
            (Category::Profanity, &self.profanity),
            (Category::HateSpeech, &self.hate_speech),
            (Category::Spam, &self.spam),
            (Category::Harassment, &self.harassment),
        ]
        .into_iter()
        .filter_map(|(c, a)| a.clone().map(|a| (c, a)))
        .collect()
    }

    /// Names of the flagged categories
    pub fn flagged_categories(&self) -> Vec<Category> {
        self.categories()
            .into_iter()
            .filter(|(_, a)| a.flagged)
            .map(|(c, _)| c)
            .collect()
    }
}

/// `{status, reason}` schema
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimpleVerdict {
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
}

/// A verdict in one of the accepted schemas
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StructuredVerdict {
    Detailed(DetailedVerdict),
    Simple(SimpleVerdict),
}

/// Outcome of reading a reply
#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    Structured(StructuredVerdict),
    /// Nothing usable; the raw text is kept for the caller
    Raw(String),
}

/// Read a verdict from raw model output.
///
/// Tries the whole text first, then the outermost `{...}` fragment.
pub fn interpret(raw: &str) -> Interpretation {
    if let Ok(verdict) = serde_json::from_str::<StructuredVerdict>(raw.trim()) {
        return Interpretation::Structured(verdict);
    }

    if let Some(fragment) = JSON_FRAGMENT.find(raw) {
        if let Ok(verdict) = serde_json::from_str::<StructuredVerdict>(fragment.as_str()) {
            return Interpretation::Structured(verdict);
        }
    }

    Interpretation::Raw(raw.to_string())
}
