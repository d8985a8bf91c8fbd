//! Rule verdicts
//!
//! The value produced by one rule evaluation: per-category evidence, the block
//! flag and the reasons behind it, in discovery order.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::rules::{Category, MatchKind};

/// One piece of evidence that text matched a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub category: Category,
    pub kind: MatchKind,
    pub value: String,
}

/// Evidence collected for one category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Evidence {
    /// Blacklist terms found as substrings
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// Hard-block patterns that matched
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub regex: Vec<String>,
}

/// Result of applying the rules to one text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleVerdict {
    blocked: bool,
    block_reasons: Vec<String>,
    flagged: BTreeMap<Category, Evidence>,
}

impl RuleVerdict {
    /// Whether the rules block the text outright
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Block reasons in discovery order
    pub fn block_reasons(&self) -> &[String] {
        &self.block_reasons
    }

    /// All reasons joined into one line
    pub fn reason(&self) -> Option<String> {
        if self.block_reasons.is_empty() {
            None
        } else {
            Some(self.block_reasons.join("; "))
        }
    }

    /// Evidence per flagged category
    pub fn flagged(&self) -> &BTreeMap<Category, Evidence> {
        &self.flagged
    }

    /// Evidence for one category
    pub fn evidence(&self, category: Category) -> Option<&Evidence> {
        self.flagged.get(&category)
    }

    /// Check if a category has any evidence
    pub fn is_flagged(&self, category: Category) -> bool {
        self.flagged.contains_key(&category)
    }

    /// Flattened hits, keyword hits before regex hits within each category
    pub fn hits(&self) -> Vec<Hit> {
        let mut hits = Vec::new();
        for (category, evidence) in &self.flagged {
            for value in &evidence.keywords {
                hits.push(Hit {
                    category: *category,
                    kind: MatchKind::Keyword,
                    value: value.clone(),
                });
            }
            for value in &evidence.regex {
                hits.push(Hit {
                    category: *category,
                    kind: MatchKind::Regex,
                    value: value.clone(),
                });
            }
        }
        hits
    }

    pub(crate) fn record_keywords(&mut self, category: Category, hits: Vec<String>) {
        if hits.is_empty() {
            return;
        }
        self.flagged.entry(category).or_default().keywords = hits;
    }

    /// Extend a category's keyword evidence.
    ///
    /// Terms already recorded are not repeated, so a spam term found by the
    /// keyword scan appears once even when the spam heuristic finds it again.
    pub(crate) fn merge_keywords(&mut self, category: Category, hits: &[String]) {
        let keywords = &mut self.flagged.entry(category).or_default().keywords;
        for hit in hits {
            if !keywords.contains(hit) {
                keywords.push(hit.clone());
            }
        }
    }

    pub(crate) fn record_regex(&mut self, category: Category, patterns: Vec<String>) {
        if patterns.is_empty() {
            return;
        }
        self.flagged.entry(category).or_default().regex = patterns;
    }

    pub(crate) fn block(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        debug_assert!(!reason.is_empty(), "block reasons must not be empty");
        self.blocked = true;
        self.block_reasons.push(reason);
    }
}
