//! Per-task orchestration: select, prompt, complete, execute, validate.

use super::completion::CompletionClient;
use super::errors::PipelineError;
use super::prompt::PromptAssembler;
use super::selector::{SelectionError, select_tool};
use super::validator::ResponseValidator;
use crate::domain::{ToolCatalog, ToolKind};
use crate::infrastructure::executor::CodeExecutor;
use crate::infrastructure::model::ModelProvider;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Execute generated code and return the value it binds
    pub execute: bool,
    /// Ask the model whether the outcome looks reasonable
    pub validate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskOutcome {
    pub task: String,
    pub tool: Option<ToolKind>,
    /// Raw model output: generated code for tool tasks, an answer otherwise
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
}

impl TaskOutcome {
    /// Executed value rendered as text, else the model response.
    pub fn answer_text(&self) -> String {
        match &self.result {
            Some(Value::String(text)) => text.clone(),
            Some(value) => value.to_string(),
            None => self.response.clone(),
        }
    }
}

pub struct TaskPipeline<P: ModelProvider, E: CodeExecutor> {
    client: Arc<CompletionClient<P>>,
    assembler: PromptAssembler,
    executor: E,
    validator: ResponseValidator<P>,
}

impl<P: ModelProvider, E: CodeExecutor> TaskPipeline<P, E> {
    pub fn new(client: Arc<CompletionClient<P>>, catalog: ToolCatalog, executor: E) -> Self {
        Self {
            validator: ResponseValidator::new(client.clone()),
            assembler: PromptAssembler::new(catalog),
            client,
            executor,
        }
    }

    pub fn client(&self) -> &Arc<CompletionClient<P>> {
        &self.client
    }

    /// Tool and prompt that `task` would be sent with.
    pub fn prompt_for(&self, task: &str) -> Result<(ToolKind, String), PipelineError> {
        let tool = select_tool(task)?;
        let prompt = self.assembler.for_kind(tool)?;
        Ok((tool, prompt))
    }

    pub async fn run(&self, task: &str, options: RunOptions) -> Result<TaskOutcome, PipelineError> {
        info!(execute = options.execute, validate = options.validate, "Running task");

        let (tool, response) = match select_tool(task) {
            Ok(tool) => {
                let prompt = self.assembler.for_kind(tool)?;
                debug!(tool = %tool, prompt_len = prompt.len(), "Assembled tool prompt");
                let code = self.client.chat(&prompt, task).await?;
                (Some(tool), code)
            }
            Err(SelectionError::NoToolMatched { .. }) => {
                info!("No tool keyword in task, using direct completion");
                (None, self.client.complete(task).await?)
            }
        };

        let result = match (tool, options.execute) {
            (Some(_), true) => match self.executor.execute(&response).await {
                Ok(value) => Some(value),
                Err(source) => {
                    return Err(PipelineError::Execution {
                        code: response,
                        source,
                    });
                }
            },
            (None, true) => {
                debug!("Direct answers are not executed");
                None
            }
            (_, false) => None,
        };

        let mut outcome = TaskOutcome {
            task: task.to_string(),
            tool,
            response,
            result,
            valid: None,
        };

        if options.validate {
            let verdict = self
                .validator
                .validate(task, &outcome.answer_text())
                .await?;
            outcome.valid = Some(verdict);
        }

        info!(tool = ?outcome.tool, valid = ?outcome.valid, "Task finished");
        Ok(outcome)
    }
}
