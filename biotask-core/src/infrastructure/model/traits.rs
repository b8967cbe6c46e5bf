//! Model traits

use super::types::{ChatRequest, CompletionRequest, EmbeddingRequest, ModelError, ModelResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// Text-completion, chat-completion and embedding endpoints of one provider.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Identifier used in logs and errors
    fn id(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<ModelResponse, ModelError>;

    async fn chat(&self, request: ChatRequest) -> Result<ModelResponse, ModelError>;

    async fn embed(&self, request: EmbeddingRequest) -> Result<Vec<f32>, ModelError>;
}

#[async_trait]
impl<P: ModelProvider + ?Sized> ModelProvider for Arc<P> {
    fn id(&self) -> &str {
        (**self).id()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<ModelResponse, ModelError> {
        (**self).complete(request).await
    }

    async fn chat(&self, request: ChatRequest) -> Result<ModelResponse, ModelError> {
        (**self).chat(request).await
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<Vec<f32>, ModelError> {
        (**self).embed(request).await
    }
}
