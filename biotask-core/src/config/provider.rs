//! # Provider Configuration
//!
//! Endpoint, model names and token windows of the OpenAI-compatible
//! provider, plus the names of the environment variables holding its
//! credentials.
//!
//! ```toml
//! [provider]
//! endpoint = "https://api.openai.com"
//! completion_model = "text-davinci-003"
//! chat_model = "gpt-3.5-turbo"
//! embedding_model = "text-embedding-ada-002"
//! context_window = 4097
//! encoding = "gpt2"
//! api_key_env = "OPENAI_API_KEY"
//! organization_env = "OPENAI_ORG"
//! ```

use super::defaults::*;
use super::error::ConfigError;
use crate::constants::{DEFAULT_CHAT_CONTEXT_WINDOW, DEFAULT_CONTEXT_WINDOW};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderSettings {
    pub endpoint: String,
    pub completion_model: String,
    pub chat_model: String,
    pub embedding_model: String,
    /// Prompt plus completion budget of the completion model
    pub context_window: usize,
    /// Prompt budget of the chat model
    pub chat_context_window: usize,
    /// Tokenizer encoding used for budget calculation
    pub encoding: String,
    pub api_key_env: String,
    pub organization_env: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            context_window: DEFAULT_CONTEXT_WINDOW,
            chat_context_window: DEFAULT_CHAT_CONTEXT_WINDOW,
            encoding: DEFAULT_ENCODING.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            organization_env: DEFAULT_ORGANIZATION_ENV.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawProviderSettings {
    pub(super) endpoint: Option<String>,
    pub(super) completion_model: Option<String>,
    pub(super) chat_model: Option<String>,
    pub(super) embedding_model: Option<String>,
    pub(super) context_window: Option<usize>,
    pub(super) chat_context_window: Option<usize>,
    pub(super) encoding: Option<String>,
    pub(super) api_key_env: Option<String>,
    pub(super) organization_env: Option<String>,
}

impl TryFrom<RawProviderSettings> for ProviderSettings {
    type Error = ConfigError;

    fn try_from(raw: RawProviderSettings) -> Result<Self, Self::Error> {
        let defaults = ProviderSettings::default();
        let settings = Self {
            endpoint: raw.endpoint.unwrap_or(defaults.endpoint),
            completion_model: raw.completion_model.unwrap_or(defaults.completion_model),
            chat_model: raw.chat_model.unwrap_or(defaults.chat_model),
            embedding_model: raw.embedding_model.unwrap_or(defaults.embedding_model),
            context_window: raw.context_window.unwrap_or(defaults.context_window),
            chat_context_window: raw
                .chat_context_window
                .unwrap_or(defaults.chat_context_window),
            encoding: raw.encoding.unwrap_or(defaults.encoding),
            api_key_env: raw.api_key_env.unwrap_or(defaults.api_key_env),
            organization_env: raw.organization_env.unwrap_or(defaults.organization_env),
        };

        if settings.endpoint.trim().is_empty() {
            return Err(ConfigError::invalid("provider.endpoint", "must not be empty"));
        }
        if settings.context_window == 0 {
            return Err(ConfigError::invalid(
                "provider.context_window",
                "must be greater than zero",
            ));
        }
        if settings.chat_context_window == 0 {
            return Err(ConfigError::invalid(
                "provider.chat_context_window",
                "must be greater than zero",
            ));
        }
        Ok(settings)
    }
}
