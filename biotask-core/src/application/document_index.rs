//! Question answering over inserted documents.
//!
//! `SummaryIndex` keeps documents in memory and answers with the completion
//! client. Tree summarization answers each token-bounded chunk of context
//! and then summarizes those answers, level by level, until one remains.

use super::completion::{CompletionClient, CompletionError};
use crate::infrastructure::model::ModelProvider;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

const CHUNK_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: String,
    pub text: String,
}

impl Document {
    pub fn new(doc_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// Answer per chunk, then summarize the answers recursively
    #[default]
    TreeSummarize,
    /// Answer from one prompt holding every document
    Compact,
}

impl ResponseMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseMode::TreeSummarize => "tree_summarize",
            ResponseMode::Compact => "compact",
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "tree_summarize" => Ok(ResponseMode::TreeSummarize),
            "compact" => Ok(ResponseMode::Compact),
            other => Err(format!("unknown response mode '{other}'")),
        }
    }
}

#[derive(Debug, Error)]
pub enum DocumentIndexError {
    #[error("document index is empty")]
    Empty,
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl DocumentIndexError {
    pub fn user_message(&self) -> String {
        match self {
            DocumentIndexError::Empty => "No documents have been added yet.".to_string(),
            DocumentIndexError::Completion(err) => err.user_message(),
        }
    }
}

#[async_trait]
pub trait DocumentIndex: Send + Sync {
    async fn insert(&self, document: Document) -> Result<(), DocumentIndexError>;

    async fn query(
        &self,
        question: &str,
        mode: ResponseMode,
    ) -> Result<String, DocumentIndexError>;
}

pub fn summary_prompt(context: &str, question: &str) -> String {
    format!(
        "Context information from multiple sources is below.\n---------------------\n{context}\n---------------------\nGiven the information from multiple sources and not prior knowledge, answer the query.\nQuery: {question}\nAnswer:"
    )
}

pub struct SummaryIndex<P: ModelProvider> {
    client: Arc<CompletionClient<P>>,
    documents: Mutex<Vec<Document>>,
    chunk_tokens: usize,
}

impl<P: ModelProvider> SummaryIndex<P> {
    /// Chunks default to half the context window, leaving the rest for answers.
    pub fn new(client: Arc<CompletionClient<P>>) -> Self {
        let chunk_tokens = (client.context_window() / 2).max(1);
        Self {
            client,
            documents: Mutex::new(Vec::new()),
            chunk_tokens,
        }
    }

    pub fn with_chunk_tokens(mut self, chunk_tokens: usize) -> Self {
        self.chunk_tokens = chunk_tokens.max(1);
        self
    }

    pub async fn len(&self) -> usize {
        self.documents.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.lock().await.is_empty()
    }

    /// Greedily join texts into chunks of at most `chunk_tokens` tokens.
    /// A text larger than the limit becomes a chunk of its own.
    fn pack(&self, texts: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_tokens = 0;
        let separator_tokens = self.client.count_tokens(CHUNK_SEPARATOR);

        for text in texts {
            let tokens = self.client.count_tokens(&text);
            if !current.is_empty() && current_tokens + separator_tokens + tokens > self.chunk_tokens {
                chunks.push(std::mem::take(&mut current));
                current_tokens = 0;
            }
            if !current.is_empty() {
                current.push_str(CHUNK_SEPARATOR);
                current_tokens += separator_tokens;
            }
            current.push_str(&text);
            current_tokens += tokens;
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }

    async fn answer_chunks(
        &self,
        chunks: &[String],
        question: &str,
    ) -> Result<Vec<String>, CompletionError> {
        let mut answers = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            answers.push(self.client.complete(&summary_prompt(chunk, question)).await?);
        }
        Ok(answers)
    }

    async fn tree_summarize(
        &self,
        texts: Vec<String>,
        question: &str,
    ) -> Result<String, CompletionError> {
        let mut chunks = self.pack(texts);
        let mut level = 0;
        loop {
            debug!(level, chunks = chunks.len(), "Summarizing level");
            let mut answers = self.answer_chunks(&chunks, question).await?;
            if answers.len() == 1 {
                return Ok(answers.remove(0));
            }
            let count = answers.len();
            chunks = self.pack(answers);
            // Answers too large to pair up still have to converge.
            if chunks.len() >= count {
                chunks = vec![chunks.join(CHUNK_SEPARATOR)];
            }
            level += 1;
        }
    }
}

#[async_trait]
impl<P: ModelProvider> DocumentIndex for SummaryIndex<P> {
    async fn insert(&self, document: Document) -> Result<(), DocumentIndexError> {
        let mut documents = self.documents.lock().await;
        match documents.iter_mut().find(|d| d.doc_id == document.doc_id) {
            Some(existing) => {
                debug!(doc_id = document.doc_id.as_str(), "Replacing document");
                *existing = document;
            }
            None => {
                debug!(doc_id = document.doc_id.as_str(), "Inserting document");
                documents.push(document);
            }
        }
        Ok(())
    }

    async fn query(
        &self,
        question: &str,
        mode: ResponseMode,
    ) -> Result<String, DocumentIndexError> {
        let texts: Vec<String> = self
            .documents
            .lock()
            .await
            .iter()
            .map(|d| d.text.clone())
            .collect();
        if texts.is_empty() {
            return Err(DocumentIndexError::Empty);
        }
        info!(documents = texts.len(), mode = %mode, "Querying document index");

        let answer = match mode {
            ResponseMode::TreeSummarize => self.tree_summarize(texts, question).await?,
            ResponseMode::Compact => {
                let context = texts.join(CHUNK_SEPARATOR);
                self.client.complete(&summary_prompt(&context, question)).await?
            }
        };
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{Reply, ScriptedProvider, client_with};
    use crate::constants::DEFAULT_SUMMARY_QUESTION;

    #[test]
    fn response_mode_parses_both_spellings() {
        assert_eq!("tree-summarize".parse::<ResponseMode>(), Ok(ResponseMode::TreeSummarize));
        assert_eq!("tree_summarize".parse::<ResponseMode>(), Ok(ResponseMode::TreeSummarize));
        assert_eq!("Compact".parse::<ResponseMode>(), Ok(ResponseMode::Compact));
        assert!("refine".parse::<ResponseMode>().is_err());
    }

    #[tokio::test]
    async fn empty_index_cannot_answer() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let index = SummaryIndex::new(client_with(provider));
        let err = index
            .query(DEFAULT_SUMMARY_QUESTION, ResponseMode::TreeSummarize)
            .await
            .expect_err("empty");
        assert!(matches!(err, DocumentIndexError::Empty));
    }

    #[tokio::test]
    async fn small_documents_fit_one_chunk() {
        let provider = Arc::new(ScriptedProvider::new(vec![Reply::text("summary")]));
        let index = SummaryIndex::new(client_with(provider.clone()));
        index.insert(Document::new("1", "BRCA1 repairs DNA.")).await.expect("insert");
        index.insert(Document::new("2", "TP53 guards the genome.")).await.expect("insert");

        let answer = index
            .query(DEFAULT_SUMMARY_QUESTION, ResponseMode::TreeSummarize)
            .await
            .expect("answer");

        assert_eq!(answer, "summary");
        let requests = provider.completions().await;
        assert_eq!(requests.len(), 1);
        assert!(requests[0].prompt.contains("BRCA1 repairs DNA.\n\nTP53 guards the genome."));
        assert!(requests[0].prompt.contains(DEFAULT_SUMMARY_QUESTION));
    }

    #[tokio::test]
    async fn tree_summarize_recurses_over_chunk_answers() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Reply::text("part one"),
            Reply::text("part two"),
            Reply::text("final"),
        ]));
        let index = SummaryIndex::new(client_with(provider.clone())).with_chunk_tokens(12);
        let long_a = "alpha ".repeat(10);
        let long_b = "beta ".repeat(10);
        index.insert(Document::new("a", long_a.trim())).await.expect("insert");
        index.insert(Document::new("b", long_b.trim())).await.expect("insert");

        let answer = index
            .query("what is covered?", ResponseMode::TreeSummarize)
            .await
            .expect("answer");

        assert_eq!(answer, "final");
        let requests = provider.completions().await;
        assert_eq!(requests.len(), 3);
        assert!(requests[2].prompt.contains("part one\n\npart two"));
    }

    #[tokio::test]
    async fn reinserting_a_doc_id_replaces_it() {
        let provider = Arc::new(ScriptedProvider::new(vec![Reply::text("ok")]));
        let index = SummaryIndex::new(client_with(provider.clone()));
        index.insert(Document::new("t1", "old")).await.expect("insert");
        index.insert(Document::new("t1", "new")).await.expect("insert");
        assert_eq!(index.len().await, 1);

        index.query("q", ResponseMode::Compact).await.expect("answer");
        let prompt = &provider.completions().await[0].prompt;
        assert!(prompt.contains("new"));
        assert!(!prompt.contains("old"));
    }
}
