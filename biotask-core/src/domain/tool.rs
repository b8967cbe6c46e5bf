//! External APIs the pipeline can generate code against.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

const PUBMED_DOCS: &str = include_str!("../../docs/pubmed_api.txt");
const MYGENE_DOCS: &str = include_str!("../../docs/mygene_api.txt");

/// A tool the selector can route a task to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    PubChem,
    MyGene,
    PubMed,
}

impl ToolKind {
    /// Selection order. The first keyword found in a task wins.
    pub const PRIORITY: [ToolKind; 3] = [ToolKind::PubChem, ToolKind::MyGene, ToolKind::PubMed];

    /// Substring that routes a task to this tool (case-sensitive).
    pub fn keyword(self) -> &'static str {
        match self {
            ToolKind::PubChem => "PubChem",
            ToolKind::MyGene => "MYGENE",
            ToolKind::PubMed => "PUBMED",
        }
    }

    /// Name used inside prompts.
    pub fn api_name(self) -> &'static str {
        match self {
            ToolKind::PubChem => "PubChem",
            ToolKind::MyGene => "mygene",
            ToolKind::PubMed => "PubMed",
        }
    }

    /// Parse a configuration key such as `pubmed` or `MYGENE`.
    pub fn from_name(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::PRIORITY.into_iter().find(|kind| {
            value.eq_ignore_ascii_case(kind.api_name()) || value.eq_ignore_ascii_case(kind.keyword())
        })
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

/// Static documentation embedded verbatim into a tool prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDocumentation {
    pub kind: ToolKind,
    pub text: String,
}

impl ToolDocumentation {
    pub fn new(kind: ToolKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Documentation available per tool.
///
/// A kind without an entry can still be selected; prompt assembly for it
/// fails with `ToolNotConfigured`.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    entries: HashMap<ToolKind, ToolDocumentation>,
}

impl ToolCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Bundled documentation for `mygene` and `PubMed`. PubChem has none.
    pub fn builtin() -> Self {
        Self::empty()
            .with_documentation(ToolKind::MyGene, MYGENE_DOCS.trim())
            .with_documentation(ToolKind::PubMed, PUBMED_DOCS.trim())
    }

    pub fn with_documentation(mut self, kind: ToolKind, text: impl Into<String>) -> Self {
        self.insert(ToolDocumentation::new(kind, text));
        self
    }

    pub fn insert(&mut self, docs: ToolDocumentation) {
        self.entries.insert(docs.kind, docs);
    }

    pub fn get(&self, kind: ToolKind) -> Option<&ToolDocumentation> {
        self.entries.get(&kind)
    }

    pub fn contains(&self, kind: ToolKind) -> bool {
        self.entries.contains_key(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_leaves_pubchem_unmapped() {
        let catalog = ToolCatalog::builtin();
        assert!(catalog.contains(ToolKind::MyGene));
        assert!(catalog.contains(ToolKind::PubMed));
        assert!(!catalog.contains(ToolKind::PubChem));
    }

    #[test]
    fn bundled_docs_are_trimmed() {
        let catalog = ToolCatalog::builtin();
        let pubmed = catalog.get(ToolKind::PubMed).expect("pubmed docs");
        assert!(pubmed.text.starts_with("API Examples"));
        assert!(pubmed.text.ends_with("==="));
        assert!(pubmed.text.contains("ret = abstracts"));
    }

    #[test]
    fn supplied_docs_keep_their_whitespace() {
        let text = "\n    import pubchempy as pcp\n    pcp.get_compounds(name)\n";
        let catalog = ToolCatalog::empty().with_documentation(ToolKind::PubChem, text);
        let docs = catalog.get(ToolKind::PubChem).expect("pubchem docs");
        assert_eq!(docs.text, text);
    }

    #[test]
    fn from_name_accepts_keyword_and_api_name() {
        assert_eq!(ToolKind::from_name("mygene"), Some(ToolKind::MyGene));
        assert_eq!(ToolKind::from_name("MYGENE"), Some(ToolKind::MyGene));
        assert_eq!(ToolKind::from_name(" pubchem "), Some(ToolKind::PubChem));
        assert_eq!(ToolKind::from_name("uniprot"), None);
    }
}
