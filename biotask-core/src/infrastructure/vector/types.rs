use crate::infrastructure::http::HttpError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct VectorQuery {
    pub vector: Vec<f32>,
    pub top_k: usize,
    pub include_metadata: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMatch {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("vector store rejected upsert of {count} records: {reason}")]
    Upsert { count: usize, reason: String },
}

impl VectorStoreError {
    pub fn user_message(&self) -> String {
        match self {
            VectorStoreError::Http(err) => err.user_message(),
            VectorStoreError::Upsert { .. } => self.to_string(),
        }
    }
}

/// Provider-side nearest-neighbour index.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn query(&self, query: VectorQuery) -> Result<Vec<VectorMatch>, VectorStoreError>;

    /// Insert or replace records, returning how many the store accepted.
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, VectorStoreError>;
}

#[async_trait]
impl<S: VectorStore + ?Sized> VectorStore for Arc<S> {
    async fn query(&self, query: VectorQuery) -> Result<Vec<VectorMatch>, VectorStoreError> {
        (**self).query(query).await
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, VectorStoreError> {
        (**self).upsert(records).await
    }
}
