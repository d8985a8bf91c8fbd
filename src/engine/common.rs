//! Common utilities for the rule engine
//!
//! Keyword scanning and log-safe text previews.

use std::collections::BTreeSet;

/// Longest text preview written to logs, in characters
pub const PREVIEW_CHARS: usize = 50;

/// Terms contained in `lowered` as plain substrings.
///
/// `lowered` must already be lowercase. Empty terms never match. Hits come
/// back in the set's (sorted) order.
pub fn scan_keywords(lowered: &str, terms: &BTreeSet<String>) -> Vec<String> {
    terms
        .iter()
        .filter(|t| !t.is_empty() && lowered.contains(t.as_str()))
        .cloned()
        .collect()
}

/// Truncate text for logging without splitting a character
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
