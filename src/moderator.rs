//! Moderation orchestrator
//!
//! Runs the rules first and only asks the remote classifier when the rules did
//! not block. Every remote-path failure becomes a result; nothing here panics
//! or returns an error once the moderator is built.

use tracing::{debug, info, warn};

use crate::classifier::anthropic::MessagesClassifier;
use crate::classifier::reply::{self, DetailedVerdict, Interpretation, SimpleVerdict, StructuredVerdict};
use crate::classifier::{RemoteClassifier, RemoteReply, Unconfigured};
use crate::config::Config;
use crate::engine::common::preview;
use crate::engine::{RuleEngine, RuleVerdict};
use crate::error::{ModerationError, Result};
use crate::output::ModerationResult;
use crate::rules::blacklist::Blacklists;

/// Rule verdict and final result for one text
#[derive(Debug, Clone)]
pub struct Analysis {
    pub rules: RuleVerdict,
    pub result: ModerationResult,
    /// Whether the remote classifier was consulted
    pub remote_called: bool,
}

/// The moderation orchestrator
pub struct Moderator {
    engine: RuleEngine,
    blacklists: Blacklists,
    classifier: Box<dyn RemoteClassifier>,
}

impl Moderator {
    /// Assemble a moderator from parts
    pub fn new(
        engine: RuleEngine,
        blacklists: Blacklists,
        classifier: Box<dyn RemoteClassifier>,
    ) -> Self {
        Self {
            engine,
            blacklists,
            classifier,
        }
    }

    /// Build from configuration: load word lists, compile rules, pick the
    /// classifier.
    ///
    /// Without a credential the remote step degrades to "skipped", unless
    /// `remote.required` is set, in which case this fails.
    pub fn from_config(config: &Config) -> Result<Self> {
        let classifier: Box<dyn RemoteClassifier> = match config.remote.api_key() {
            Some(key) => Box::new(MessagesClassifier::new(key, &config.remote)?),
            None if config.remote.required => {
                return Err(ModerationError::Configuration(
                    "remote classifier is required but ANTHROPIC_API_KEY is not set".to_string(),
                ));
            }
            None => {
                warn!("No API key configured; remote classification will be skipped");
                Box::new(Unconfigured::missing_credential())
            }
        };
        Self::with_classifier(config, classifier)
    }

    /// Build from configuration with the remote step switched off
    pub fn rules_only(config: &Config) -> Result<Self> {
        Self::with_classifier(config, Box::new(Unconfigured::disabled()))
    }

    /// Build from configuration with a caller-supplied classifier
    pub fn with_classifier(config: &Config, classifier: Box<dyn RemoteClassifier>) -> Result<Self> {
        let engine = RuleEngine::from_config(config)?;
        let blacklists = Blacklists::load_from(config.blacklist_dir())?;
        debug!(
            terms = blacklists.len(),
            patterns = engine.pattern_count(),
            classifier = classifier.name(),
            "Moderator ready"
        );
        Ok(Self::new(engine, blacklists, classifier))
    }

    /// Run only the rule stage
    pub fn check_rules(&self, text: &str) -> RuleVerdict {
        self.engine.apply_rules(text, &self.blacklists)
    }

    /// Moderate one text
    pub fn analyze(&self, text: &str) -> ModerationResult {
        self.explain(text).result
    }

    /// Alias of [`Moderator::analyze`]
    pub fn moderate_text(&self, text: &str) -> ModerationResult {
        self.analyze(text)
    }

    /// Moderate one text and keep the rule evidence
    pub fn explain(&self, text: &str) -> Analysis {
        let rules = self.check_rules(text);

        if let Some(reason) = rules.reason().filter(|_| rules.is_blocked()) {
            info!(reason = %reason, text = %preview(text), "Blocked by rules");
            return Analysis {
                result: ModerationResult::blocked_by_rules(reason),
                rules,
                remote_called: false,
            };
        }

        let result = normalize_reply(self.classifier.classify(text));
        match &result {
            ModerationResult::Blocked { reason, .. } => {
                info!(reason = %reason, text = %preview(text), "Blocked by classifier")
            }
            ModerationResult::Error { reason } => {
                warn!(classifier = self.classifier.name(), reason = %reason, "Classifier failed")
            }
            ModerationResult::Indeterminate { .. } => {
                warn!(classifier = self.classifier.name(), "Classifier reply not understood")
            }
            _ => {}
        }

        Analysis {
            rules,
            result,
            remote_called: true,
        }
    }

    /// Loaded word lists
    pub fn blacklists(&self) -> &Blacklists {
        &self.blacklists
    }

    /// The rule engine
    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }
}

/// Turn a classifier outcome into a moderation result
pub fn normalize_reply(outcome: Result<RemoteReply>) -> ModerationResult {
    match outcome {
        Ok(RemoteReply::Unavailable { note }) => ModerationResult::Unavailable { note },
        Ok(RemoteReply::Text(raw)) if raw.trim().is_empty() => {
            ModerationResult::error("empty response from classifier")
        }
        Ok(RemoteReply::Text(raw)) => match reply::interpret(&raw) {
            Interpretation::Structured(StructuredVerdict::Detailed(v)) => from_detailed(v),
            Interpretation::Structured(StructuredVerdict::Simple(v)) => from_simple(v, raw),
            Interpretation::Raw(raw) => ModerationResult::Indeterminate { raw },
        },
        Err(e) => ModerationResult::error(e.to_string()),
    }
}

fn from_detailed(verdict: DetailedVerdict) -> ModerationResult {
    let categories = verdict.categories();
    if verdict.violation {
        let flagged: Vec<&str> = verdict
            .flagged_categories()
            .iter()
            .map(|c| c.as_str())
            .collect();
        let reason = if !verdict.reason.trim().is_empty() {
            verdict.reason
        } else if flagged.is_empty() {
            "Blocked by classifier".to_string()
        } else {
            format!("Flagged by classifier: {}", flagged.join(", "))
        };
        ModerationResult::blocked_by_remote(reason).with_categories(categories)
    } else {
        ModerationResult::approved(&verdict.reason).with_categories(categories)
    }
}

fn from_simple(verdict: SimpleVerdict, raw: String) -> ModerationResult {
    match verdict.status.trim().to_uppercase().as_str() {
        "APPROVED" => ModerationResult::approved(&verdict.reason),
        "BLOCKED" => {
            let reason = if verdict.reason.trim().is_empty() {
                "Blocked by classifier".to_string()
            } else {
                verdict.reason
            };
            ModerationResult::blocked_by_remote(reason)
        }
        "ERROR" => ModerationResult::error(verdict.reason),
        _ => ModerationResult::Indeterminate { raw },
    }
}
