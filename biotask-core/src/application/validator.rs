//! Second-opinion check of a goal/response pair.

use super::completion::{CompletionClient, CompletionError};
use crate::infrastructure::model::{CompletionParams, ModelProvider};
use std::sync::Arc;
use tracing::info;

/// Strict yes/no policy: only a trimmed, case-insensitive `yes` passes.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().to_lowercase() == "yes"
}

pub fn validation_prompt(goal: &str, response: &str) -> String {
    format!(
        "I gave an LLM this goal: '{goal}' and it gave this response: '{response}'. Is this reasonable, or did something go wrong? [yes|no]"
    )
}

pub struct ResponseValidator<P: ModelProvider> {
    client: Arc<CompletionClient<P>>,
}

impl<P: ModelProvider> ResponseValidator<P> {
    pub fn new(client: Arc<CompletionClient<P>>) -> Self {
        Self { client }
    }

    pub async fn validate(&self, goal: &str, response: &str) -> Result<bool, CompletionError> {
        let prompt = validation_prompt(goal, response);
        let answer = self
            .client
            .complete_with(&prompt, CompletionParams::default().with_temperature(0.0))
            .await?;
        let verdict = is_affirmative(&answer);
        info!(verdict, "Validated model response");
        Ok(verdict)
    }
}
