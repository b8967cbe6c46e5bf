// Shared stubs for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use biotask_core::completion::CompletionClient;
use biotask_core::config::ProviderSettings;
use biotask_core::executor::{CodeExecutor, ExecutionError};
use biotask_core::infrastructure::http::HttpError;
use biotask_core::model::{
    ChatRequest, CompletionRequest, EmbeddingRequest, ModelError, ModelProvider, ModelResponse,
    RetryPolicy, TokenCounter,
};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub enum Step {
    Answer(&'static str),
    Throttled,
    Overloaded,
}

/// Replays canned answers and records every request it sees.
#[derive(Default)]
pub struct StubProvider {
    steps: Mutex<VecDeque<Step>>,
    pub prompts: Mutex<Vec<String>>,
    pub chats: Mutex<Vec<ChatRequest>>,
    pub max_tokens: Mutex<Vec<Option<usize>>>,
}

impl StubProvider {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            ..Default::default()
        })
    }

    fn next(&self) -> Result<ModelResponse, ModelError> {
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Answer(text)) => Ok(ModelResponse::new(text)),
            Some(Step::Throttled) => Err(HttpError::RateLimited {
                service: "stub".into(),
                message: "rate limit reached".into(),
            }
            .into()),
            Some(Step::Overloaded) => Err(HttpError::Transient {
                service: "stub".into(),
                status: 502,
                message: "bad gateway".into(),
            }
            .into()),
            None => Err(ModelError::InvalidResponse {
                provider: "stub".into(),
                reason: "script exhausted".into(),
            }),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn chat_count(&self) -> usize {
        self.chats.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for StubProvider {
    fn id(&self) -> &str {
        "stub"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<ModelResponse, ModelError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        self.max_tokens.lock().unwrap().push(request.max_tokens);
        self.next()
    }

    async fn chat(&self, request: ChatRequest) -> Result<ModelResponse, ModelError> {
        self.chats.lock().unwrap().push(request);
        self.next()
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<Vec<f32>, ModelError> {
        Ok(vec![request.input.len() as f32, 1.0])
    }
}

pub fn client(
    provider: Arc<StubProvider>,
    settings: ProviderSettings,
) -> Arc<CompletionClient<Arc<StubProvider>>> {
    let counter = TokenCounter::for_encoding(&settings.encoding).expect("encoding");
    let retry = RetryPolicy::new(5, Duration::from_millis(1), Duration::from_millis(4));
    Arc::new(CompletionClient::new(provider, settings, counter, retry))
}

/// Executor that answers from a closure instead of spawning an interpreter.
pub struct FnExecutor<F>(pub F);

#[async_trait]
impl<F> CodeExecutor for FnExecutor<F>
where
    F: Fn(&str) -> Result<Value, ExecutionError> + Send + Sync,
{
    async fn execute(&self, code: &str) -> Result<Value, ExecutionError> {
        (self.0)(code)
    }
}
