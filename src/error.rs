//! Error types for content-guardrails
//!
//! Rule evaluation itself cannot fail. Errors come from loading configuration
//! and word lists, compiling configured patterns, and talking to the remote
//! classifier. The orchestrator turns every remote-path error into a result.

use thiserror::Error;

use crate::rules::Category;

/// Unified error type for the library.
#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid {category} pattern {pattern:?}: {source}")]
    InvalidPattern {
        category: Category,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModerationError>;
