use super::error::ConfigError;
use crate::domain::ToolKind;
use serde::Deserialize;
use std::path::PathBuf;

/// Documentation override for one tool, keyed by tool name in `[tools]`.
///
/// ```toml
/// [tools.pubchem]
/// documentation_path = "~/biotask/pubchem_api.txt"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    pub kind: ToolKind,
    pub documentation_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawToolSettings {
    pub(super) documentation_path: String,
}

impl ToolSettings {
    pub(super) fn from_raw(name: &str, raw: RawToolSettings) -> Result<Self, ConfigError> {
        let kind = ToolKind::from_name(name).ok_or_else(|| ConfigError::UnknownTool {
            name: name.to_string(),
        })?;
        let expanded = shellexpand::tilde(raw.documentation_path.trim()).into_owned();
        Ok(Self {
            kind,
            documentation_path: PathBuf::from(expanded),
        })
    }
}
