//! Remote classifier seam
//!
//! The orchestrator talks to the remote moderation model only through the
//! [`RemoteClassifier`] trait. [`anthropic::MessagesClassifier`] is the one
//! compiled-in adapter; [`Unconfigured`] stands in when no credential is set.

pub mod anthropic;
pub mod reply;

use crate::error::Result;

/// What the remote side produced for one text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteReply {
    /// The classifier cannot be used (no credential, remote step disabled)
    Unavailable { note: String },

    /// Raw text the model answered with
    Text(String),
}

/// A blocking remote moderation classifier.
///
/// Transport failures and non-success responses come back as `Err`; the
/// orchestrator turns them into ERROR results.
pub trait RemoteClassifier: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Classify one text
    fn classify(&self, text: &str) -> Result<RemoteReply>;
}

/// Placeholder used when the remote step cannot run
#[derive(Debug, Clone)]
pub struct Unconfigured {
    note: String,
}

impl Unconfigured {
    /// No API credential was configured
    pub fn missing_credential() -> Self {
        Self::new("no API key provided (set ANTHROPIC_API_KEY)")
    }

    /// The remote step was switched off by the caller
    pub fn disabled() -> Self {
        Self::new("remote classifier disabled (rules-only mode)")
    }

    pub fn new(note: impl Into<String>) -> Self {
        Self { note: note.into() }
    }
}

impl RemoteClassifier for Unconfigured {
    fn name(&self) -> &str {
        "unconfigured"
    }

    fn classify(&self, _text: &str) -> Result<RemoteReply> {
        Ok(RemoteReply::Unavailable {
            note: self.note.clone(),
        })
    }
}
