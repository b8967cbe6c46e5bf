//! Pinecone-compatible index client

use super::types::{VectorMatch, VectorQuery, VectorRecord, VectorStore, VectorStoreError};
use crate::config::{ConfigError, VectorStoreSettings};
use crate::infrastructure::http::{HttpClientBase, HttpError, require_key};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, info};

#[derive(Clone)]
pub struct PineconeIndex {
    base: HttpClientBase,
    namespace: Option<String>,
}

impl PineconeIndex {
    pub fn new(settings: &VectorStoreSettings, api_key: &str) -> Result<Self, HttpError> {
        let key = require_key("pinecone", api_key)?;
        let base = HttpClientBase::new("pinecone", settings.host.clone()).with_header("Api-Key", key);
        Ok(Self {
            base,
            namespace: settings.namespace.clone(),
        })
    }

    /// Resolve the API key from the variable named in `settings`.
    pub fn from_env(settings: &VectorStoreSettings) -> Result<Self, ConfigError> {
        crate::config::loader::ensure_env_loaded();
        let api_key = env::var(&settings.api_key_env)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnv {
                var: settings.api_key_env.clone(),
            })?;
        Self::new(settings, &api_key).map_err(|_| ConfigError::MissingEnv {
            var: settings.api_key_env.clone(),
        })
    }
}

#[async_trait]
impl VectorStore for PineconeIndex {
    async fn query(&self, query: VectorQuery) -> Result<Vec<VectorMatch>, VectorStoreError> {
        let payload = QueryPayload {
            vector: &query.vector,
            top_k: query.top_k,
            include_metadata: query.include_metadata,
            namespace: self.namespace.as_deref(),
        };
        debug!(top_k = query.top_k, "Querying vector index");
        let response: QueryResponse = self.base.post_json("/query", &payload).await?;
        Ok(response.matches)
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, VectorStoreError> {
        let count = records.len();
        let payload = UpsertPayload {
            vectors: &records,
            namespace: self.namespace.as_deref(),
        };
        let response: UpsertResponse = self.base.post_json("/vectors/upsert", &payload).await?;
        if response.upserted_count != count {
            return Err(VectorStoreError::Upsert {
                count,
                reason: format!("store reported {} upserted", response.upserted_count),
            });
        }
        info!(count, "Upserted vectors");
        Ok(response.upserted_count)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryPayload<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<VectorMatch>,
}

#[derive(Serialize)]
struct UpsertPayload<'a> {
    vectors: &'a [VectorRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_payload_uses_camel_case() {
        let vector = [0.1_f32, 0.2];
        let payload = QueryPayload {
            vector: &vector,
            top_k: 5,
            include_metadata: true,
            namespace: None,
        };
        let value = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(value["topK"], json!(5));
        assert_eq!(value["includeMetadata"], json!(true));
        assert!(value.get("namespace").is_none());
    }

    #[test]
    fn query_response_defaults_missing_metadata() {
        let parsed: QueryResponse = serde_json::from_value(json!({
            "matches": [{ "id": "t1", "score": 0.9 }]
        }))
        .expect("deserialize");
        assert_eq!(parsed.matches[0].id, "t1");
        assert!(parsed.matches[0].metadata.is_empty());
    }

    #[test]
    fn blank_key_is_rejected() {
        let settings = VectorStoreSettings {
            host: "https://index.example".into(),
            api_key_env: "PINECONE_API_KEY".into(),
            top_k: 5,
            namespace: None,
        };
        assert!(PineconeIndex::new(&settings, " ").is_err());
    }
}
