//! Keyword routing from a task string to a tool.

use crate::domain::ToolKind;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no tool keyword (PubChem, MYGENE, PUBMED) found in task: '{task}'")]
    NoToolMatched { task: String },
}

/// Pick the tool whose keyword appears in `task`.
///
/// Keywords are matched as case-sensitive substrings in priority order
/// `PubChem`, `MYGENE`, `PUBMED`.
pub fn select_tool(task: &str) -> Result<ToolKind, SelectionError> {
    let selected = ToolKind::PRIORITY
        .into_iter()
        .find(|kind| task.contains(kind.keyword()));
    match selected {
        Some(kind) => {
            debug!(tool = %kind, "Selected tool for task");
            Ok(kind)
        }
        None => Err(SelectionError::NoToolMatched {
            task: task.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_keyword_selects_its_tool() {
        assert_eq!(
            select_tool("PubChem: find the weight of aspirin"),
            Ok(ToolKind::PubChem)
        );
        assert_eq!(
            select_tool("MYGENE: summary of BRCA1"),
            Ok(ToolKind::MyGene)
        );
        assert_eq!(
            select_tool("PUBMED: abstracts on breast cancer"),
            Ok(ToolKind::PubMed)
        );
    }

    #[test]
    fn keyword_may_appear_anywhere() {
        assert_eq!(
            select_tool("look up TP53 with MYGENE please"),
            Ok(ToolKind::MyGene)
        );
    }

    #[test]
    fn priority_order_breaks_ties() {
        assert_eq!(
            select_tool("PUBMED and MYGENE and PubChem"),
            Ok(ToolKind::PubChem)
        );
        assert_eq!(select_tool("PUBMED then MYGENE"), Ok(ToolKind::MyGene));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(select_tool("pubmed: lowercase keyword").is_err());
        assert!(select_tool("Mygene: mixed case").is_err());
    }

    #[test]
    fn no_keyword_names_the_task() {
        let err = select_tool("What is the capital of France?").expect_err("no tool");
        assert_eq!(
            err,
            SelectionError::NoToolMatched {
                task: "What is the capital of France?".into()
            }
        );
        assert!(err.to_string().contains("What is the capital of France?"));
    }
}
