pub mod completion;
pub mod document_index;
pub mod errors;
pub mod knowledge;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod selector;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_support;

pub use completion::{CompletionClient, CompletionError};
pub use document_index::{Document, DocumentIndex, DocumentIndexError, ResponseMode, SummaryIndex};
pub use errors::PipelineError;
pub use knowledge::{KnowledgeBase, KnowledgeError};
pub use parser::ContentParser;
pub use pipeline::{RunOptions, TaskOutcome, TaskPipeline};
pub use prompt::{PromptAssembler, PromptError, assemble_tool_prompt};
pub use selector::{SelectionError, select_tool};
pub use validator::{ResponseValidator, is_affirmative};
