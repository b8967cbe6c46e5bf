//! Free-form extraction over arbitrary content.

use super::completion::{CompletionClient, CompletionError};
use crate::infrastructure::model::ModelProvider;
use std::sync::Arc;

pub struct ContentParser<P: ModelProvider> {
    client: Arc<CompletionClient<P>>,
}

impl<P: ModelProvider> ContentParser<P> {
    pub fn new(client: Arc<CompletionClient<P>>) -> Self {
        Self { client }
    }

    /// Ask the model to apply `instruction` to `content`.
    pub async fn parse(&self, instruction: &str, content: &str) -> Result<String, CompletionError> {
        let prompt = format!("{instruction}\nHere is the content to parse:\n{content}");
        self.client.complete(&prompt).await
    }
}
