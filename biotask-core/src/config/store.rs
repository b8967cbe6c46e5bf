use super::defaults::{DEFAULT_TOP_K, DEFAULT_VECTOR_API_KEY_ENV};
use super::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Pinecone-compatible index holding embedded task results.
///
/// ```toml
/// [vector_store]
/// host = "https://tasks-abc123.svc.us-east1-gcp.pinecone.io"
/// api_key_env = "PINECONE_API_KEY"
/// top_k = 5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VectorStoreSettings {
    pub host: String,
    pub api_key_env: String,
    pub top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawVectorStoreSettings {
    pub(super) host: Option<String>,
    pub(super) api_key_env: Option<String>,
    pub(super) top_k: Option<usize>,
    #[serde(default)]
    pub(super) namespace: Option<String>,
}

impl TryFrom<RawVectorStoreSettings> for VectorStoreSettings {
    type Error = ConfigError;

    fn try_from(raw: RawVectorStoreSettings) -> Result<Self, Self::Error> {
        let host = raw
            .host
            .filter(|host| !host.trim().is_empty())
            .ok_or_else(|| ConfigError::invalid("vector_store.host", "is required"))?;
        let top_k = raw.top_k.unwrap_or(DEFAULT_TOP_K);
        if top_k == 0 {
            return Err(ConfigError::invalid(
                "vector_store.top_k",
                "must be greater than zero",
            ));
        }
        Ok(Self {
            host,
            api_key_env: raw
                .api_key_env
                .unwrap_or_else(|| DEFAULT_VECTOR_API_KEY_ENV.to_string()),
            top_k,
            namespace: raw.namespace,
        })
    }
}
