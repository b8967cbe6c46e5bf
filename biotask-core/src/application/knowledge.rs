//! Retrieval of earlier task results from the vector store.

use super::completion::{CompletionClient, CompletionError};
use crate::constants::RESULT_METADATA_KEY;
use crate::infrastructure::model::ModelProvider;
use crate::infrastructure::vector::{
    VectorMatch, VectorQuery, VectorRecord, VectorStore, VectorStoreError,
};
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("failed to embed text: {0}")]
    Embedding(#[from] CompletionError),
    #[error(transparent)]
    Store(#[from] VectorStoreError),
    #[error("match '{id}' has no 'Result' metadata")]
    MissingResult { id: String },
}

impl KnowledgeError {
    pub fn user_message(&self) -> String {
        match self {
            KnowledgeError::Embedding(err) => err.user_message(),
            KnowledgeError::Store(err) => err.user_message(),
            KnowledgeError::MissingResult { .. } => self.to_string(),
        }
    }
}

pub struct KnowledgeBase<P: ModelProvider, S: VectorStore> {
    client: Arc<CompletionClient<P>>,
    store: S,
}

impl<P: ModelProvider, S: VectorStore> KnowledgeBase<P, S> {
    pub fn new(client: Arc<CompletionClient<P>>, store: S) -> Self {
        Self { client, store }
    }

    /// Stored results of the `top_k` tasks nearest to `query`, best first.
    pub async fn relevant(&self, query: &str, top_k: usize) -> Result<Vec<String>, KnowledgeError> {
        let vector = self.client.embed(query).await?;
        let mut matches = self
            .store
            .query(VectorQuery {
                vector,
                top_k,
                include_metadata: true,
            })
            .await?;
        sort_by_score(&mut matches);
        debug!(matches = matches.len(), "Retrieved relevant results");

        matches.iter().map(result_text).collect()
    }

    /// Store a pre-computed vector under `id`.
    pub async fn insert(
        &self,
        id: &str,
        values: Vec<f32>,
        metadata: Map<String, Value>,
    ) -> Result<usize, KnowledgeError> {
        let record = VectorRecord {
            id: id.to_string(),
            values,
            metadata,
        };
        Ok(self.store.upsert(vec![record]).await?)
    }

    /// Embed `task` and store `result` alongside it.
    pub async fn remember(&self, id: &str, task: &str, result: &str) -> Result<(), KnowledgeError> {
        let values = self.client.embed(task).await?;
        let mut metadata = Map::new();
        metadata.insert("Task".into(), Value::String(task.to_string()));
        metadata.insert(RESULT_METADATA_KEY.into(), Value::String(result.to_string()));
        metadata.insert("Timestamp".into(), Value::String(Utc::now().to_rfc3339()));
        self.insert(id, values, metadata).await?;
        info!(id, "Stored task result");
        Ok(())
    }
}

/// Highest score first. Equal scores keep provider order.
pub fn sort_by_score(matches: &mut [VectorMatch]) {
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
}

fn result_text(item: &VectorMatch) -> Result<String, KnowledgeError> {
    match item.metadata.get(RESULT_METADATA_KEY) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(KnowledgeError::MissingResult {
            id: item.id.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{ScriptedProvider, client_with};
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Mutex;

    struct FixedStore {
        matches: Vec<VectorMatch>,
        queries: Mutex<Vec<VectorQuery>>,
        upserts: Mutex<Vec<VectorRecord>>,
    }

    impl FixedStore {
        fn new(matches: Vec<VectorMatch>) -> Self {
            Self {
                matches,
                queries: Mutex::new(Vec::new()),
                upserts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VectorStore for FixedStore {
        async fn query(&self, query: VectorQuery) -> Result<Vec<VectorMatch>, VectorStoreError> {
            self.queries.lock().await.push(query);
            Ok(self.matches.clone())
        }

        async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, VectorStoreError> {
            let count = records.len();
            self.upserts.lock().await.extend(records);
            Ok(count)
        }
    }

    fn matched(id: &str, score: f32, result: Value) -> VectorMatch {
        let mut metadata = Map::new();
        metadata.insert(RESULT_METADATA_KEY.into(), result);
        VectorMatch {
            id: id.into(),
            score,
            metadata,
        }
    }

    #[tokio::test]
    async fn relevant_results_are_sorted_by_score() {
        let store = Arc::new(FixedStore::new(vec![
            matched("a", 0.2, json!("low")),
            matched("b", 0.9, json!("high")),
            matched("c", 0.5, json!(17)),
        ]));
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let kb = KnowledgeBase::new(client_with(provider), store.clone());

        let results = kb.relevant("brca1 variants", 3).await.expect("query");

        assert_eq!(results, vec!["high", "17", "low"]);
        let queries = store.queries.lock().await;
        assert_eq!(queries[0].top_k, 3);
        assert!(queries[0].include_metadata);
    }

    #[tokio::test]
    async fn match_without_result_is_an_error() {
        let store = FixedStore::new(vec![VectorMatch {
            id: "orphan".into(),
            score: 0.4,
            metadata: Map::new(),
        }]);
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let kb = KnowledgeBase::new(client_with(provider), store);

        let err = kb.relevant("anything", 1).await.expect_err("missing result");
        assert!(matches!(err, KnowledgeError::MissingResult { ref id } if id == "orphan"));
    }

    #[tokio::test]
    async fn remember_stores_task_and_result() {
        let store = Arc::new(FixedStore::new(vec![]));
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let kb = KnowledgeBase::new(client_with(provider.clone()), store.clone());

        kb.remember("task-1", "MYGENE: TP53\nsummary", "tumour protein p53")
            .await
            .expect("stored");

        let upserts = store.upserts.lock().await;
        assert_eq!(upserts.len(), 1);
        assert_eq!(upserts[0].id, "task-1");
        assert_eq!(upserts[0].metadata["Result"], json!("tumour protein p53"));
        assert_eq!(upserts[0].metadata["Task"], json!("MYGENE: TP53\nsummary"));
        assert!(upserts[0].metadata.contains_key("Timestamp"));
        assert_eq!(provider.embeddings().await[0].input, "MYGENE: TP53 summary");
    }

    #[test]
    fn sort_keeps_order_of_equal_scores() {
        let mut matches = vec![
            matched("first", 0.5, json!("1")),
            matched("second", 0.5, json!("2")),
            matched("top", 0.7, json!("3")),
        ];
        sort_by_score(&mut matches);
        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "first", "second"]);
    }
}
