//! Chat-completions client.

use std::time::Duration;

use fiscaliza_core::AppConfig;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::SimplifyError;
use crate::prompt::{user_message, SYSTEM_PROMPT};

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Result of a successful simplification.
///
/// Lengths are counted in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifyResponse {
    pub simplified_text: String,
    pub original_length: usize,
    pub simplified_length: usize,
}

pub struct Simplifier {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl Simplifier {
    /// Builds a client for `{base_url}/chat/completions`.
    ///
    /// A missing `api_key` is not an error here; every call then fails with
    /// [`SimplifyError::MissingApiKey`].
    ///
    /// # Errors
    ///
    /// Returns [`SimplifyError::Transport`] if the `reqwest` client cannot be
    /// built.
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SimplifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// # Errors
    ///
    /// Returns [`SimplifyError::Transport`] if the `reqwest` client cannot be
    /// built.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SimplifyError> {
        Self::new(
            &config.ai_base_url,
            &config.ai_model,
            config.ai_api_key.clone(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Rewrites `text` in plain language.
    ///
    /// # Errors
    ///
    /// - [`SimplifyError::MissingInput`] for blank text
    /// - [`SimplifyError::MissingApiKey`] when no credential is configured
    /// - [`SimplifyError::RateLimited`] on 429, [`SimplifyError::QuotaExhausted`] on 402
    /// - [`SimplifyError::Upstream`] on any other non-2xx status
    /// - [`SimplifyError::Transport`] on network failure or an unparseable body
    /// - [`SimplifyError::EmptyResponse`] when the reply has no content
    pub async fn simplify(&self, text: &str) -> Result<SimplifyResponse, SimplifyError> {
        if text.trim().is_empty() {
            return Err(SimplifyError::MissingInput);
        }
        let api_key = self.api_key.as_deref().ok_or(SimplifyError::MissingApiKey)?;

        let prompt = user_message(text);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        tracing::info!(chars = text.chars().count(), "simplifying legislation text");
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "AI endpoint returned an error");
            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => SimplifyError::RateLimited,
                StatusCode::PAYMENT_REQUIRED => SimplifyError::QuotaExhausted,
                other => SimplifyError::Upstream {
                    status: other.as_u16(),
                },
            });
        }

        let reply: ChatResponse = response.json().await?;
        let simplified_text = reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(SimplifyError::EmptyResponse)?;

        Ok(SimplifyResponse {
            original_length: text.chars().count(),
            simplified_length: simplified_text.chars().count(),
            simplified_text,
        })
    }
}
