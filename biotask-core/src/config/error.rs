use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("required environment variable '{var}' is not set")]
    MissingEnv { var: String },

    #[error("unknown tool '{name}' in [tools] section")]
    UnknownTool { name: String },

    #[error("failed to read documentation for tool '{tool}' from {path:?}: {source}")]
    Documentation {
        tool: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ConfigError::MissingEnv { var } => format!(
                "Environment variable '{var}' must be set (export it or add it to config/.env)."
            ),
            ConfigError::NotFound { path } => {
                format!("Configuration file {} does not exist.", path.display())
            }
            other => other.to_string(),
        }
    }
}
