//! Hard-block pattern registry
//!
//! Phrase-level patterns for severe, unambiguous violations. Any match blocks
//! the text outright, whatever the blacklists say.

use crate::rules::{Category, HardBlockPattern};

/// Harassment phrases - direct threats
pub const HARASSMENT_PATTERNS: &[HardBlockPattern] = &[
    HardBlockPattern::new(Category::Harassment, r"\bkill\s+yourself\b"),
    HardBlockPattern::new(Category::Harassment, r"i\s+will\s+find\s+you"),
];

/// Hate speech phrases - dehumanization and exclusion
pub const HATE_SPEECH_PATTERNS: &[HardBlockPattern] = &[
    HardBlockPattern::new(Category::HateSpeech, r"\bsubhuman\b"),
    HardBlockPattern::new(Category::HateSpeech, r"go\s+back\s+to\s+your\s+country"),
];

/// Pattern registry, in regex scan order
pub const REGISTRY: &[(Category, &[HardBlockPattern])] = &[
    (Category::Harassment, HARASSMENT_PATTERNS),
    (Category::HateSpeech, HATE_SPEECH_PATTERNS),
];

/// Built-in patterns for one category, in declaration order
pub fn builtin_patterns(category: Category) -> &'static [HardBlockPattern] {
    REGISTRY
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, patterns)| *patterns)
        .unwrap_or(&[])
}

/// Categories in regex scan order: registry categories first, then the rest
/// in `Category::ALL` order.
pub fn scan_order() -> Vec<Category> {
    let mut order: Vec<Category> = REGISTRY.iter().map(|(c, _)| *c).collect();
    for category in Category::ALL {
        if !order.contains(&category) {
            order.push(category);
        }
    }
    order
}

/// All built-in patterns, in registry order
pub fn all_builtin_patterns() -> Vec<&'static HardBlockPattern> {
    REGISTRY
        .iter()
        .flat_map(|(_, patterns)| patterns.iter())
        .collect()
}
