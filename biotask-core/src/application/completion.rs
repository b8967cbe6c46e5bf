//! Completion client: token budget, retry and the provider call.

use crate::config::{PipelineContext, ProviderSettings};
use crate::infrastructure::model::{
    ChatRequest, CompletionParams, CompletionRequest, EmbeddingRequest, ModelError,
    ModelProvider, PromptTooLong, RetryPolicy, TokenBudget, TokenCounter, TokenizerError,
};
use crate::types::ChatMessage;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error(transparent)]
    PromptTooLong(#[from] PromptTooLong),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl CompletionError {
    pub fn user_message(&self) -> String {
        match self {
            CompletionError::PromptTooLong(err) => format!(
                "The prompt is too long ({} tokens, limit {}). Shorten the task or its context.",
                err.tokens, err.limit
            ),
            CompletionError::Model(err) => err.user_message(),
        }
    }
}

/// Sends prompts to a provider. Holds no state between calls.
pub struct CompletionClient<P: ModelProvider> {
    provider: P,
    settings: ProviderSettings,
    budget: TokenBudget,
    retry: RetryPolicy,
}

impl<P: ModelProvider> CompletionClient<P> {
    pub fn new(
        provider: P,
        settings: ProviderSettings,
        counter: TokenCounter,
        retry: RetryPolicy,
    ) -> Self {
        let budget = TokenBudget::new(counter, settings.context_window);
        Self {
            provider,
            settings,
            budget,
            retry,
        }
    }

    pub fn from_context(provider: P, context: &PipelineContext) -> Result<Self, TokenizerError> {
        let settings = context.config.provider.clone();
        let counter = TokenCounter::for_encoding(&settings.encoding)?;
        let retry = RetryPolicy::from_settings(&context.config.retry);
        Ok(Self::new(provider, settings, counter, retry))
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    pub fn context_window(&self) -> usize {
        self.budget.window()
    }

    pub fn count_tokens(&self, text: &str) -> usize {
        self.budget.counter().count(text)
    }

    /// Text completion with default sampling (temperature 0).
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.complete_with(prompt, CompletionParams::default()).await
    }

    /// Text completion whose `max_tokens` is what the window has left.
    ///
    /// Fails with `PromptTooLong` before any request when nothing is left.
    pub async fn complete_with(
        &self,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<String, CompletionError> {
        let max_tokens = self.budget.remaining(prompt).inspect_err(|err| {
            warn!(tokens = err.tokens, limit = err.limit, "Prompt exceeds context window");
        })?;
        debug!(max_tokens, "Computed completion budget");

        let request = CompletionRequest {
            model: self.settings.completion_model.clone(),
            prompt: prompt.to_string(),
            params,
            max_tokens: Some(max_tokens),
        };
        let response = self
            .retry
            .run("completion", || self.provider.complete(request.clone()))
            .await?;
        Ok(response.content)
    }

    /// Chat completion with one system and one user message.
    ///
    /// The combined prompt must fit the chat window; no `max_tokens` is sent.
    pub async fn chat(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let tokens = self.count_tokens(system) + self.count_tokens(user);
        let limit = self.settings.chat_context_window;
        if tokens >= limit {
            warn!(tokens, limit, "Chat prompt exceeds context window");
            return Err(PromptTooLong { tokens, limit }.into());
        }

        let request = ChatRequest {
            model: self.settings.chat_model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: 0.0,
        };
        let response = self
            .retry
            .run("chat", || self.provider.chat(request.clone()))
            .await?;
        Ok(response.content)
    }

    /// Embedding of `text` with newlines folded into spaces.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, CompletionError> {
        let request = EmbeddingRequest {
            model: self.settings.embedding_model.clone(),
            input: text.replace('\n', " "),
        };
        let vector = self
            .retry
            .run("embedding", || self.provider.embed(request.clone()))
            .await?;
        Ok(vector)
    }
}
