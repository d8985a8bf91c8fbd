//! content-guardrails - Layered text moderation
//!
//! Classifies free-form text as BLOCKED or APPROVED. Cheap local rules run
//! first; only text they do not block is sent to a remote language-model
//! classifier.
//!
//! # Features
//!
//! - **Keyword blacklists**: per-category word lists, matched as substrings
//! - **Hard-block phrases**: case-insensitive regex patterns that block outright
//! - **Spam heuristic**: raw links or several spam terms block without a remote call
//! - **Keyword policy**: keyword hits as evidence only, or as immediate blocks
//! - **Remote classifier**: Anthropic Messages API, degrading to "skipped" without a key
//!
//! # Example
//!
//! ```
//! use content_guardrails::{apply_rules, Blacklists, Category};
//!
//! let lists = Blacklists::empty()
//!     .with_terms(Category::Spam, ["buy now", "http://"]);
//!
//! let verdict = apply_rules("Buy now!!! http://spam.com", &lists);
//! assert!(verdict.is_blocked());
//! assert!(verdict.block_reasons()[0].contains("spam"));
//! ```

pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod moderator;
pub mod output;
pub mod rules;

// Re-exports for convenience
pub use classifier::{RemoteClassifier, RemoteReply};
pub use config::{Config, KeywordPolicy};
pub use engine::{apply_rules, Hit, RuleEngine, RuleVerdict};
pub use error::{ModerationError, Result};
pub use moderator::{Analysis, Moderator};
pub use output::{ModerationReport, ModerationResult, Source, Status};
pub use rules::blacklist::Blacklists;
pub use rules::{Category, MatchKind};
