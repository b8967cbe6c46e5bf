//! OpenAI-compatible client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{Credentials, ProviderSettings};
use crate::infrastructure::http::{HttpClientBase, HttpError};
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{
    ChatRequest, CompletionRequest, EmbeddingRequest, ModelError, ModelResponse,
};

const COMPLETIONS_PATH: &str = "/v1/completions";
const CHAT_PATH: &str = "/v1/chat/completions";
const EMBEDDINGS_PATH: &str = "/v1/embeddings";

/// Client for OpenAI-compatible completion, chat and embedding endpoints
#[derive(Clone)]
pub struct OpenAIClient {
    base: HttpClientBase,
}

impl OpenAIClient {
    pub fn from_settings(
        settings: &ProviderSettings,
        credentials: &Credentials,
    ) -> Result<Self, HttpError> {
        let base = HttpClientBase::new("openai", settings.endpoint.clone())
            .with_bearer(&credentials.api_key)?
            .with_header("OpenAI-Organization", credentials.organization.clone());
        Ok(Self { base })
    }
}

#[async_trait]
impl ModelProvider for OpenAIClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn complete(&self, request: CompletionRequest) -> Result<ModelResponse, ModelError> {
        let payload = CompletionPayload {
            model: &request.model,
            prompt: &request.prompt,
            temperature: request.params.temperature,
            top_p: request.params.top_p,
            frequency_penalty: request.params.frequency_penalty,
            presence_penalty: request.params.presence_penalty,
            max_tokens: request.max_tokens,
        };

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            max_tokens = ?request.max_tokens,
            "Sending text completion request"
        );

        let response: CompletionResponse = self.base.post_json(COMPLETIONS_PATH, &payload).await?;
        debug!("Received text completion response");

        let text = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing choices"))?;

        Ok(ModelResponse::new(text))
    }

    async fn chat(&self, request: ChatRequest) -> Result<ModelResponse, ModelError> {
        let messages: Vec<ChatPayloadMessage<'_>> = request
            .messages
            .iter()
            .map(|message| ChatPayloadMessage {
                role: message.role.as_str(),
                content: &message.content,
            })
            .collect();
        let payload = ChatPayload {
            model: &request.model,
            messages,
            temperature: request.temperature,
        };

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response: ChatResponse = self.base.post_json(CHAT_PATH, &payload).await?;
        debug!("Received chat completion response");

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing content"))?;

        Ok(ModelResponse::new(content))
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<Vec<f32>, ModelError> {
        let payload = EmbeddingPayload {
            model: &request.model,
            input: [request.input.as_str()],
        };

        debug!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            "Requesting embedding"
        );

        let response: EmbeddingResponse = self.base.post_json(EMBEDDINGS_PATH, &payload).await?;

        response
            .data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .filter(|vector| !vector.is_empty())
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing embedding"))
    }
}

#[derive(Serialize)]
struct CompletionPayload<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

#[derive(Serialize)]
struct ChatPayload<'a> {
    model: &'a str,
    messages: Vec<ChatPayloadMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatPayloadMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingPayload<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn completion_payload_omits_missing_max_tokens() {
        let payload = CompletionPayload {
            model: "text-davinci-003",
            prompt: "hi",
            temperature: 0.0,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            max_tokens: None,
        };
        let value = serde_json::to_value(&payload).expect("serialize");
        assert!(value.get("max_tokens").is_none());
        assert_eq!(value["model"], json!("text-davinci-003"));
    }

    #[test]
    fn chat_response_tolerates_null_content() {
        let parsed: ChatResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        }))
        .expect("deserialize");
        assert!(parsed.choices[0].message.as_ref().unwrap().content.is_none());
    }

    #[test]
    fn rejects_blank_api_key() {
        let result = OpenAIClient::from_settings(
            &ProviderSettings::default(),
            &Credentials::new("", "org"),
        );
        assert!(matches!(result, Err(HttpError::MissingApiKey { .. })));
    }
}
