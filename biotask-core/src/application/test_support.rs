//! Scripted provider shared by unit tests.

use crate::application::completion::CompletionClient;
use crate::config::ProviderSettings;
use crate::infrastructure::http::HttpError;
use crate::infrastructure::model::{
    ChatRequest, CompletionRequest, EmbeddingRequest, ModelError, ModelProvider, ModelResponse,
    RetryPolicy, TokenCounter,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub(crate) enum Reply {
    Text(String),
    RateLimited,
    Transient,
    Rejected,
}

impl Reply {
    pub(crate) fn text(value: &str) -> Self {
        Reply::Text(value.to_string())
    }

    fn into_result(self) -> Result<ModelResponse, ModelError> {
        match self {
            Reply::Text(text) => Ok(ModelResponse::new(text)),
            Reply::RateLimited => Err(HttpError::RateLimited {
                service: "scripted".into(),
                message: "slow down".into(),
            }
            .into()),
            Reply::Transient => Err(HttpError::Transient {
                service: "scripted".into(),
                status: 503,
                message: "overloaded".into(),
            }
            .into()),
            Reply::Rejected => Err(HttpError::Rejected {
                service: "scripted".into(),
                status: 400,
                message: "invalid request".into(),
            }
            .into()),
        }
    }
}

/// Answers completion and chat calls from one queue; embeds to a fixed vector.
pub(crate) struct ScriptedProvider {
    replies: Mutex<VecDeque<Reply>>,
    completions: Mutex<Vec<CompletionRequest>>,
    chats: Mutex<Vec<ChatRequest>>,
    embeddings: Mutex<Vec<EmbeddingRequest>>,
}

impl ScriptedProvider {
    pub(crate) fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            completions: Mutex::new(Vec::new()),
            chats: Mutex::new(Vec::new()),
            embeddings: Mutex::new(Vec::new()),
        }
    }

    pub(crate) async fn completions(&self) -> Vec<CompletionRequest> {
        self.completions.lock().await.clone()
    }

    pub(crate) async fn chats(&self) -> Vec<ChatRequest> {
        self.chats.lock().await.clone()
    }

    pub(crate) async fn embeddings(&self) -> Vec<EmbeddingRequest> {
        self.embeddings.lock().await.clone()
    }

    async fn next_reply(&self) -> Result<ModelResponse, ModelError> {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Reply::text("no more scripted replies"))
            .into_result()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<ModelResponse, ModelError> {
        self.completions.lock().await.push(request);
        self.next_reply().await
    }

    async fn chat(&self, request: ChatRequest) -> Result<ModelResponse, ModelError> {
        self.chats.lock().await.push(request);
        self.next_reply().await
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<Vec<f32>, ModelError> {
        self.embeddings.lock().await.push(request);
        Ok(vec![0.25, 0.5, 0.25])
    }
}

pub(crate) fn client_with(
    provider: Arc<ScriptedProvider>,
) -> Arc<CompletionClient<Arc<ScriptedProvider>>> {
    let counter = TokenCounter::for_encoding("gpt2").expect("gpt2 encoding");
    let retry = RetryPolicy::new(4, Duration::from_millis(1), Duration::from_millis(5));
    Arc::new(CompletionClient::new(
        provider,
        ProviderSettings::default(),
        counter,
        retry,
    ))
}
