//! Configuration loading for content-guardrails
//!
//! Supports TOML configuration with embedded defaults, overridden by
//! environment variables (a `.env` file is honoured by the binary).

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use tracing::warn;

use crate::error::Result;
use crate::rules::Category;

/// What a keyword blacklist hit means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeywordPolicy {
    /// Keyword hits are evidence only; regex phrases and the spam heuristic block
    #[default]
    Evidence,

    /// Any keyword hit blocks immediately
    Block,
}

impl KeywordPolicy {
    /// Whether keyword hits alone block the text
    pub fn blocks_on_keywords(&self) -> bool {
        matches!(self, KeywordPolicy::Block)
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "evidence" => Some(KeywordPolicy::Evidence),
            "block" => Some(KeywordPolicy::Block),
            _ => None,
        }
    }
}

/// General configuration section
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Keyword severity model
    pub keyword_policy: KeywordPolicy,
}

/// Word-list configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlacklistConfig {
    /// Directory holding `<category>.txt` word lists
    pub dir: String,
}

impl Default for BlacklistConfig {
    fn default() -> Self {
        Self {
            dir: DEFAULT_BLACKLIST_DIR.to_string(),
        }
    }
}

/// Remote classifier configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// API credential. Prefer the ANTHROPIC_API_KEY environment variable.
    pub api_key: Option<String>,

    /// Model identifier
    pub model: String,

    /// Fail construction instead of degrading when no credential is set
    pub required: bool,

    /// API base URL
    pub base_url: String,

    /// Maximum tokens in the classifier reply
    pub max_tokens: u32,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            required: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: 400,
            timeout_secs: 30,
        }
    }
}

impl RemoteConfig {
    /// The credential, if one is set and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// An extra hard-block pattern supplied by configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PatternEntry {
    pub category: Category,
    pub pattern: String,
}

/// Rule configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RulesConfig {
    /// Patterns appended to the built-in registry
    pub patterns: Vec<PatternEntry>,
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub blacklist: BlacklistConfig,
    pub remote: RemoteConfig,
    pub rules: RulesConfig,
}

impl Config {
    /// Load configuration from standard locations, then apply the environment
    pub fn load() -> Self {
        let config_paths = [
            // User-specific config
            dirs::config_dir().map(|p| p.join("content-guardrails/config.toml")),
            // System-wide config
            Some(PathBuf::from("/etc/content-guardrails/config.toml")),
        ];

        let mut config = Config::default();
        for path in config_paths.into_iter().flatten() {
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(loaded) => {
                        config = loaded;
                        break;
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Failed to load config");
                    }
                }
            }
        }

        config.apply_env();
        config
    }

    /// Load from a specific path (environment not applied)
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) {
        if let Ok(key) = env::var("ANTHROPIC_API_KEY") {
            if !key.trim().is_empty() {
                self.remote.api_key = Some(key.trim().to_string());
            }
        }
        if let Ok(model) = env::var("ANTHROPIC_MODEL") {
            if !model.trim().is_empty() {
                self.remote.model = model.trim().to_string();
            }
        }
        if let Ok(dir) = env::var("BLACKLIST_DIR") {
            if !dir.trim().is_empty() {
                self.blacklist.dir = dir.trim().to_string();
            }
        }
        if let Ok(policy) = env::var("GUARDRAILS_KEYWORD_POLICY") {
            match KeywordPolicy::from_str(&policy) {
                Some(p) => self.general.keyword_policy = p,
                None => warn!(value = %policy, "Ignoring unknown GUARDRAILS_KEYWORD_POLICY"),
            }
        }
    }

    /// Expand ~ in path strings
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get the blacklist directory (expanded)
    pub fn blacklist_dir(&self) -> PathBuf {
        Self::expand_path(&self.blacklist.dir)
    }
}

/// Default model for the remote classifier
pub const DEFAULT_MODEL: &str = "claude-3-7-sonnet-20250219";

/// Default word-list directory
pub const DEFAULT_BLACKLIST_DIR: &str = "./data/blacklist";

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Embedded default configuration
pub const DEFAULT_CONFIG_TOML: &str = r#"
[general]
keyword_policy = "evidence"

[blacklist]
dir = "./data/blacklist"

[remote]
model = "claude-3-7-sonnet-20250219"
required = false
base_url = "https://api.anthropic.com"
max_tokens = 400
timeout_secs = 30

# Extra hard-block phrases, appended to the built-in registry
# [[rules.patterns]]
# category = "spam"
# pattern = "wire\\s+transfer\\s+fee"
"#;
