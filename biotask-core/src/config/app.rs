use super::error::ConfigError;
use super::provider::ProviderSettings;
use super::runtime::{ExecutorSettings, RetrySettings};
use super::store::VectorStoreSettings;
use super::tool::ToolSettings;
use crate::domain::ToolCatalog;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Application configuration loaded from biotask.toml
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub provider: ProviderSettings,
    pub retry: RetrySettings,
    pub executor: ExecutorSettings,
    pub vector_store: Option<VectorStoreSettings>,
    pub tools: Vec<ToolSettings>,
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    /// Parse configuration held in memory. `origin` is only used in errors.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        super::loader::parse_config(content, origin)
    }

    /// Bundled tool documentation with configured overrides applied.
    pub fn tool_catalog(&self) -> Result<ToolCatalog, ConfigError> {
        let mut catalog = ToolCatalog::builtin();
        for tool in &self.tools {
            let text = fs::read_to_string(&tool.documentation_path).map_err(|source| {
                ConfigError::Documentation {
                    tool: tool.kind.to_string(),
                    path: tool.documentation_path.clone(),
                    source,
                }
            })?;
            debug!(
                tool = %tool.kind,
                path = %tool.documentation_path.display(),
                "Loaded tool documentation override"
            );
            catalog = catalog.with_documentation(tool.kind, text);
        }
        Ok(catalog)
    }
}
