use super::completion::CompletionError;
use super::document_index::DocumentIndexError;
use super::knowledge::KnowledgeError;
use super::prompt::PromptError;
use super::selector::SelectionError;
use crate::config::ConfigError;
use crate::infrastructure::executor::ExecutionError;
use crate::infrastructure::http::HttpError;
use crate::infrastructure::model::TokenizerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Completion(#[from] CompletionError),
    /// Generated code failed; `code` is what the model produced.
    #[error("{source}")]
    Execution {
        code: String,
        #[source]
        source: ExecutionError,
    },
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
    #[error(transparent)]
    DocumentIndex(#[from] DocumentIndexError),
}

impl PipelineError {
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Config(err) => err.user_message(),
            PipelineError::Http(err) => err.user_message(),
            PipelineError::Selection(SelectionError::NoToolMatched { task }) => format!(
                "No tool keyword found in task \"{task}\". Prefix it with PubChem, MYGENE or PUBMED."
            ),
            PipelineError::Prompt(PromptError::ToolNotConfigured { tool }) => format!(
                "Tool \"{tool}\" has no documentation. Add [tools.{}] documentation_path to the configuration.",
                tool.api_name().to_ascii_lowercase()
            ),
            PipelineError::Completion(err) => err.user_message(),
            PipelineError::Execution { code, source } => {
                format!("{}\nGenerated code:\n{code}", source.user_message())
            }
            PipelineError::Knowledge(err) => err.user_message(),
            PipelineError::DocumentIndex(err) => err.user_message(),
            PipelineError::Tokenizer(err) => err.to_string(),
        }
    }
}
