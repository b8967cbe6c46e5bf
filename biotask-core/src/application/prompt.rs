//! Code-generation prompt for a selected tool.

use crate::domain::{ToolCatalog, ToolDocumentation, ToolKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("tool '{tool}' has no documentation configured")]
    ToolNotConfigured { tool: ToolKind },
}

/// Build the instruction prompt for `docs`. Pure string formatting.
pub fn assemble_tool_prompt(docs: &ToolDocumentation) -> String {
    let api_name = docs.kind.api_name();
    let api_info = &docs.text;
    format!(
        "You have access to query the {api_name} API. If a task starts with '{api_name}:' then you should create the code to query the {api_name} API based off the documentation and return the code to complete your task. If you use the {api_name} API, do not answer with words, simply answer with the code to query the API and then cease output. Be sure that it is a valid API call that will execute in a python interpreter\n---\nHere is the {api_name} documentation\n{api_info}\n---"
    )
    .trim()
    .to_string()
}

/// Resolves tool documentation and formats the prompt.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    catalog: ToolCatalog,
}

impl PromptAssembler {
    pub fn new(catalog: ToolCatalog) -> Self {
        Self { catalog }
    }

    pub fn for_kind(&self, kind: ToolKind) -> Result<String, PromptError> {
        let docs = self
            .catalog
            .get(kind)
            .ok_or(PromptError::ToolNotConfigured { tool: kind })?;
        Ok(assemble_tool_prompt(docs))
    }
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(ToolCatalog::builtin())
    }
}
