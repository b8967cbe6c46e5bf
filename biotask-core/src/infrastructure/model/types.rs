//! Model types - Request, Response, and Error types

use super::retry::Transient;
use crate::infrastructure::http::HttpError;
use crate::types::ChatMessage;
use thiserror::Error;

/// Sampling parameters of a text completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParams {
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

impl CompletionParams {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Request against the legacy text-completion endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub params: CompletionParams,
    pub max_tokens: Option<usize>,
}

/// Request against the chat-completion endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

/// Single-input embedding request
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingRequest {
    pub model: String,
    pub input: String,
}

/// Text of the first choice, trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResponse {
    pub content: String,
}

impl ModelResponse {
    pub fn new(content: impl AsRef<str>) -> Self {
        Self {
            content: content.as_ref().trim().to_string(),
        }
    }
}

/// Model errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

impl ModelError {
    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ModelError::Http(err) => err.user_message(),
            ModelError::InvalidResponse { provider, .. } => {
                format!("Response from '{provider}' was not valid.")
            }
        }
    }
}

impl Transient for ModelError {
    fn is_transient(&self) -> bool {
        match self {
            ModelError::Http(err) => err.is_transient(),
            ModelError::InvalidResponse { .. } => false,
        }
    }
}
