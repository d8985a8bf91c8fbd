//! Moderation results and their JSON output
//!
//! [`ModerationResult`] is what callers branch on; [`ModerationReport`] is the
//! JSON shape printed by the CLI.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::classifier::reply::CategoryAssessment;
use crate::engine::RuleVerdict;
use crate::rules::Category;

/// Status of a decided result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Approved,
    Blocked,
    Error,
}

/// Which stage produced a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Rules,
    Remote,
}

/// The outcome of moderating one text
#[derive(Debug, Clone, PartialEq)]
pub enum ModerationResult {
    /// Passed the rules and the remote classifier
    Approved {
        reason: String,
        categories: BTreeMap<Category, CategoryAssessment>,
    },

    /// Blocked by the rules or by the remote classifier
    Blocked {
        reason: String,
        source: Source,
        categories: BTreeMap<Category, CategoryAssessment>,
    },

    /// The remote call failed
    Error { reason: String },

    /// The remote check was skipped (no credential, rules-only mode)
    Unavailable { note: String },

    /// The remote reply could not be read; callers must not treat this as approval
    Indeterminate { raw: String },
}

impl ModerationResult {
    /// Create an approval. The reason always says the text passed.
    pub fn approved(detail: &str) -> Self {
        let reason = if detail.trim().is_empty() {
            APPROVED_REASON.to_string()
        } else {
            format!("{}: {}", APPROVED_REASON, detail.trim())
        };
        ModerationResult::Approved {
            reason,
            categories: BTreeMap::new(),
        }
    }

    /// Create a block from the rule stage
    pub fn blocked_by_rules(reason: impl Into<String>) -> Self {
        ModerationResult::Blocked {
            reason: reason.into(),
            source: Source::Rules,
            categories: BTreeMap::new(),
        }
    }

    /// Create a block from the remote stage
    pub fn blocked_by_remote(reason: impl Into<String>) -> Self {
        ModerationResult::Blocked {
            reason: reason.into(),
            source: Source::Remote,
            categories: BTreeMap::new(),
        }
    }

    /// Create an error result
    pub fn error(reason: impl Into<String>) -> Self {
        ModerationResult::Error {
            reason: reason.into(),
        }
    }

    /// Attach the classifier's per-category assessment
    pub fn with_categories(mut self, assessed: BTreeMap<Category, CategoryAssessment>) -> Self {
        match &mut self {
            ModerationResult::Approved { categories, .. }
            | ModerationResult::Blocked { categories, .. } => *categories = assessed,
            _ => {}
        }
        self
    }

    /// Status, if the result is decided
    pub fn status(&self) -> Option<Status> {
        match self {
            ModerationResult::Approved { .. } => Some(Status::Approved),
            ModerationResult::Blocked { .. } => Some(Status::Blocked),
            ModerationResult::Error { .. } => Some(Status::Error),
            ModerationResult::Unavailable { .. } | ModerationResult::Indeterminate { .. } => None,
        }
    }

    /// Check if this is an approval
    pub fn is_approved(&self) -> bool {
        matches!(self, ModerationResult::Approved { .. })
    }

    /// Check if this is a block
    pub fn is_blocked(&self) -> bool {
        matches!(self, ModerationResult::Blocked { .. })
    }

    /// Get the reason, for decided results
    pub fn reason(&self) -> Option<&str> {
        match self {
            ModerationResult::Approved { reason, .. }
            | ModerationResult::Blocked { reason, .. }
            | ModerationResult::Error { reason } => Some(reason),
            ModerationResult::Unavailable { .. } | ModerationResult::Indeterminate { .. } => None,
        }
    }
}

/// Reason prefix for approvals
pub const APPROVED_REASON: &str = "Text passed all checks";

/// JSON shape of a result
#[derive(Debug, Serialize)]
pub struct ModerationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub categories: BTreeMap<Category, CategoryAssessment>,

    /// Set when the remote check did not run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Unreadable classifier output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,

    /// Rule evidence, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<RuleVerdict>,
}

impl ModerationReport {
    /// Create a report from a result
    pub fn from_result(result: &ModerationResult) -> Self {
        let mut report = ModerationReport {
            status: result.status(),
            reason: result.reason().map(String::from),
            source: None,
            categories: BTreeMap::new(),
            skipped: None,
            note: None,
            raw: None,
            rules: None,
        };

        match result {
            ModerationResult::Approved { categories, .. } => {
                report.categories = categories.clone();
            }
            ModerationResult::Blocked {
                source, categories, ..
            } => {
                report.source = Some(*source);
                report.categories = categories.clone();
            }
            ModerationResult::Error { .. } => {}
            ModerationResult::Unavailable { note } => {
                report.skipped = Some(true);
                report.note = Some(note.clone());
            }
            ModerationResult::Indeterminate { raw } => {
                report.raw = Some(raw.clone());
            }
        }

        report
    }

    /// Include the rule verdict
    pub fn with_rules(mut self, verdict: RuleVerdict) -> Self {
        self.rules = Some(verdict);
        self
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Serialize to indented JSON
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Serialize for ModerationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ModerationReport::from_result(self).serialize(serializer)
    }
}
