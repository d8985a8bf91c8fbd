//! Anthropic Messages API classifier.
//!
//! Sends the text with a moderation system prompt and returns the model's text
//! content untouched; interpretation happens in [`super::reply`].
//!
//! API docs: https://docs.anthropic.com/en/api/messages

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{RemoteClassifier, RemoteReply};
use crate::config::RemoteConfig;
use crate::engine::common::preview;
use crate::error::{ModerationError, Result};

/// Messages API version this adapter speaks
pub const API_VERSION: &str = "2023-06-01";

/// Instructions sent as the system prompt
pub const SYSTEM_PROMPT: &str = r#"You are a strict content moderator. Classify the user's MESSAGE against these categories:
- hate_speech: insults or dehumanization aimed at protected characteristics.
- profanity: offensive or vulgar language, including standalone swearing.
- spam: unsolicited promotion, scams, repeated links, mass marketing.
- harassment: targeted threats, intimidation, sustained abuse.

Answer with compact JSON only, no prose, using exactly this schema:
{
  "hate_speech": {"flagged": <true|false>, "confidence": <0..1>, "evidence": ["..."]},
  "profanity":   {"flagged": <true|false>, "confidence": <0..1>, "evidence": ["..."]},
  "spam":        {"flagged": <true|false>, "confidence": <0..1>, "evidence": ["..."]},
  "harassment":  {"flagged": <true|false>, "confidence": <0..1>, "evidence": ["..."]},
  "violation":   <true|false>,
  "reason":      "one short sentence naming the categories involved and why"
}
When a message is borderline, set flagged=false and violation=false."#;

/// Classifier backed by the Anthropic Messages API
pub struct MessagesClassifier {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
}

impl MessagesClassifier {
    /// Create a classifier with the given credential and remote settings
    pub fn new(api_key: impl Into<String>, remote: &RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(remote.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: remote.model.clone(),
            base_url: remote.base_url.trim_end_matches('/').to_string(),
            max_tokens: remote.max_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn request<'a>(&'a self, text: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: 0.0,
            system: SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: text,
            }],
        }
    }
}

impl RemoteClassifier for MessagesClassifier {
    fn name(&self) -> &str {
        "anthropic-messages"
    }

    fn classify(&self, text: &str) -> Result<RemoteReply> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.request(text))
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(ModerationError::Transport(format!(
                "Claude API error: {} - {}",
                status, body
            )));
        }

        let body: MessagesResponse = response
            .json()
            .map_err(|e| ModerationError::Parse(format!("Failed to parse Claude response: {}", e)))?;

        let reply = body.text();
        debug!(model = %self.model, reply = %preview(&reply), "Classifier replied");
        Ok(RemoteReply::Text(reply))
    }
}

// --- Messages API request/response types ---

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// Concatenated text blocks
    fn text(&self) -> String {
        self.content
            .iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}
