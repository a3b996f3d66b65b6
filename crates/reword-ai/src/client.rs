// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! OpenRouter chat-completions client
//!
//! A blocking client: the rewrite pipeline is strictly sequential, and every
//! prompt depends on the answer to the previous commit.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::AiError;
use crate::generator::TextGenerator;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-lite";

/// Upper bound on one completion request, connect to last byte
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection settings for [`OpenRouterClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Bearer token
    pub api_key: Option<String>,
    /// Model identifier sent with every request
    pub model: String,
    /// API root, without the `/chat/completions` suffix
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Default settings with the given API key
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Override the model
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API root
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Full URL of the chat-completions endpoint
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Text generator backed by the OpenRouter chat-completions API
pub struct OpenRouterClient {
    agent: ureq::Agent,
    api_key: String,
    config: ClientConfig,
}

impl std::fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenRouterClient {
    /// Create a client
    ///
    /// # Errors
    ///
    /// Returns `AiError::MissingApiKey` if the config has no (or an empty) key.
    pub fn new(config: ClientConfig) -> Result<Self, AiError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AiError::MissingApiKey)?;
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .new_agent();
        Ok(Self {
            agent,
            api_key,
            config,
        })
    }

    /// The model this client talks to
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

/// Build the request body for a single-turn completion
fn request_body(model: &str, prompt: &str, max_output_tokens: u32) -> serde_json::Value {
    json!({
        "model": model,
        "messages": [{ "role": "user", "content": prompt }],
        "max_tokens": max_output_tokens,
    })
}

/// Pull the first choice's text out of a response body
fn parse_response(body: &str, model: &str) -> Result<String, AiError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| AiError::EmptyResponse {
            model: model.to_string(),
        })
}

impl TextGenerator for OpenRouterClient {
    fn generate(&self, prompt: &str, max_output_tokens: u32) -> Result<String, AiError> {
        let url = self.config.completions_url();
        let payload = request_body(&self.config.model, prompt, max_output_tokens);
        debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            max_output_tokens,
            "Requesting completion"
        );

        let mut response = self
            .agent
            .post(&url)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send(payload.to_string())?;
        let body = response.body_mut().read_to_string()?;

        parse_response(&body, &self.config.model)
    }
}
