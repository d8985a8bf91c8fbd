//! Moderation rules for content-guardrails
//!
//! Defines the category set, the hard-block pattern registry and the
//! per-category keyword blacklists.

pub mod blacklist;
pub mod patterns;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A moderation category. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Profanity,
    HateSpeech,
    Spam,
    Harassment,
}

impl Category {
    /// Every category, in scan order
    pub const ALL: [Category; 4] = [
        Category::Profanity,
        Category::HateSpeech,
        Category::Spam,
        Category::Harassment,
    ];

    /// Name used in reasons, word-list file names and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Profanity => "profanity",
            Category::HateSpeech => "hate_speech",
            Category::Spam => "spam",
            Category::Harassment => "harassment",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "profanity" => Some(Category::Profanity),
            "hate_speech" | "hate-speech" => Some(Category::HateSpeech),
            "spam" => Some(Category::Spam),
            "harassment" => Some(Category::Harassment),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a piece of text matched a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Keyword,
    Regex,
}

/// A phrase-level hard-block rule
#[derive(Debug, Clone)]
pub struct HardBlockPattern {
    /// Category the pattern belongs to
    pub category: Category,

    /// Regex pattern, matched case-insensitively
    pub pattern: &'static str,
}

impl HardBlockPattern {
    /// Create a new pattern
    pub const fn new(category: Category, pattern: &'static str) -> Self {
        Self { category, pattern }
    }
}
