//! Error types for reword-ai

use thiserror::Error;

/// Errors that can occur while asking the model for text
///
/// The rewrite pipeline treats every variant the same way (log and fall
/// back), so these only need to be descriptive.
#[derive(Debug, Error)]
pub enum AiError {
    /// No API key was configured
    #[error("Missing API key: set OPENROUTER_API_KEY or pass --api-key")]
    MissingApiKey,

    /// Transport, TLS or HTTP status error
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    /// Response body was not the expected JSON
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The model answered without any text
    #[error("Empty response from model {model}")]
    EmptyResponse {
        /// The model that was asked
        model: String,
    },
}
