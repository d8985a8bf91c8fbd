//! Rule engine for content-guardrails
//!
//! Scans text against the keyword blacklists and the hard-block pattern
//! registry. The engine holds only compiled, read-only state, so one instance
//! can serve concurrent callers.

pub mod common;
pub mod verdict;

use once_cell::sync::Lazy;
use regex::{RegexBuilder, RegexSet, RegexSetBuilder};
use tracing::debug;

use crate::config::{Config, KeywordPolicy, PatternEntry};
use crate::error::{ModerationError, Result};
use crate::rules::blacklist::Blacklists;
use crate::rules::patterns::{builtin_patterns, scan_order};
use crate::rules::Category;

pub use verdict::{Evidence, Hit, RuleVerdict};

/// Reason appended when the spam heuristic fires
pub const SPAM_HEURISTIC_REASON: &str = "Rule hard-block: spam heuristic";

/// Spam terms starting with this are raw links
const LINK_PREFIX: &str = "http";

/// Distinct spam terms needed to block without a link
const SPAM_TERM_THRESHOLD: usize = 2;

static DEFAULT_ENGINE: Lazy<RuleEngine> = Lazy::new(|| {
    RuleEngine::new(KeywordPolicy::Evidence, &[]).expect("built-in patterns compile")
});

/// Apply the built-in rules with the evidence-only keyword policy
pub fn apply_rules(text: &str, blacklists: &Blacklists) -> RuleVerdict {
    DEFAULT_ENGINE.apply_rules(text, blacklists)
}

/// The rule engine
pub struct RuleEngine {
    keyword_policy: KeywordPolicy,
    /// Category order for regex reasons
    regex_order: Vec<Category>,
    /// (category, source pattern), grouped by category in scan order
    patterns: Vec<(Category, String)>,
    /// Case-insensitive set over `patterns`, same indices
    pattern_set: RegexSet,
}

impl RuleEngine {
    /// Build an engine from the built-in registry plus extra patterns.
    ///
    /// Fails on the first pattern that does not compile.
    pub fn new(keyword_policy: KeywordPolicy, extra: &[PatternEntry]) -> Result<Self> {
        let regex_order = scan_order();
        let mut patterns: Vec<(Category, String)> = Vec::new();
        for &category in &regex_order {
            for rule in builtin_patterns(category) {
                patterns.push((category, rule.pattern.to_string()));
            }
            for entry in extra.iter().filter(|e| e.category == category) {
                patterns.push((category, entry.pattern.clone()));
            }
        }

        for (category, pattern) in &patterns {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| ModerationError::InvalidPattern {
                    category: *category,
                    pattern: pattern.clone(),
                    source,
                })?;
        }

        let pattern_set = RegexSetBuilder::new(patterns.iter().map(|(_, p)| p.as_str()))
            .case_insensitive(true)
            .build()
            .map_err(|e| ModerationError::Configuration(format!("pattern set: {}", e)))?;

        Ok(Self {
            keyword_policy,
            regex_order,
            patterns,
            pattern_set,
        })
    }

    /// Create an engine from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.general.keyword_policy, &config.rules.patterns)
    }

    /// Evaluate one text.
    ///
    /// Order: keyword scan, regex hard-blocks, spam heuristic. Reasons are
    /// appended in that order.
    pub fn apply_rules(&self, text: &str, blacklists: &Blacklists) -> RuleVerdict {
        let mut verdict = RuleVerdict::default();
        let lowered = text.to_lowercase();

        // 1. Keyword evidence
        for (category, terms) in blacklists.iter() {
            let hits = common::scan_keywords(&lowered, terms);
            if hits.is_empty() {
                continue;
            }
            debug!(category = %category, hits = ?hits, "Keyword hits");
            if self.keyword_policy.blocks_on_keywords() {
                verdict.block(format!(
                    "Rule hard-block: {} via keywords [{}]",
                    category,
                    hits.join(", ")
                ));
            }
            verdict.record_keywords(category, hits);
        }

        // 2. Regex hard-blocks
        let matched: Vec<usize> = self.pattern_set.matches(text).into_iter().collect();
        for &category in &self.regex_order {
            let hits: Vec<String> = matched
                .iter()
                .map(|&idx| &self.patterns[idx])
                .filter(|(c, _)| *c == category)
                .map(|(_, p)| p.clone())
                .collect();
            if hits.is_empty() {
                continue;
            }
            debug!(category = %category, patterns = ?hits, "Hard-block patterns matched");
            verdict.block(format!(
                "Rule hard-block: {} via regex [{}]",
                category,
                hits.join(", ")
            ));
            verdict.record_regex(category, hits);
        }

        // 3. Spam heuristic
        if blacklists.contains(Category::Spam) {
            let spam_hits = common::scan_keywords(&lowered, blacklists.get(Category::Spam));
            let has_link = spam_hits.iter().any(|h| h.starts_with(LINK_PREFIX));
            if has_link || spam_hits.len() >= SPAM_TERM_THRESHOLD {
                debug!(hits = ?spam_hits, has_link, "Spam heuristic fired");
                verdict.merge_keywords(Category::Spam, &spam_hits);
                verdict.block(SPAM_HEURISTIC_REASON);
            }
        }

        verdict
    }

    /// The keyword policy in force
    pub fn keyword_policy(&self) -> KeywordPolicy {
        self.keyword_policy
    }

    /// Number of compiled hard-block patterns
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}
