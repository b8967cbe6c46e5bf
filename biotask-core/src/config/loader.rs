use super::error::ConfigError;
use super::provider::{ProviderSettings, RawProviderSettings};
use super::runtime::{ExecutorSettings, RawExecutorSettings, RawRetrySettings, RetrySettings};
use super::store::{RawVectorStoreSettings, VectorStoreSettings};
use super::tool::{RawToolSettings, ToolSettings};
use crate::constants::{CONFIG_PATH, ENV_PATH};
use dotenvy::from_filename;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, info};

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub provider: RawProviderSettings,
    #[serde(default)]
    pub retry: RawRetrySettings,
    #[serde(default)]
    pub executor: RawExecutorSettings,
    pub vector_store: Option<RawVectorStoreSettings>,
    #[serde(default)]
    pub tools: BTreeMap<String, RawToolSettings>,
}

/// Ensures environment variables are loaded from config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        if from_filename(ENV_PATH).is_ok() {
            debug!(path = ENV_PATH, "Loaded environment file");
        }
    });
}

/// Load and validate configuration.
///
/// An explicit path must exist. Without one, `config/biotask.toml` is read
/// when present and built-in defaults are used otherwise.
pub fn load_config(path: Option<&Path>) -> Result<super::AppConfig, ConfigError> {
    ensure_env_loaded();
    match path {
        Some(path) => read_config(&expand(path)),
        None => {
            let default_path = Path::new(CONFIG_PATH);
            if default_path.exists() {
                read_config(default_path)
            } else {
                info!(
                    path = CONFIG_PATH,
                    "No configuration file found, using built-in defaults"
                );
                Ok(super::AppConfig::default())
            }
        }
    }
}

/// Parse configuration from TOML text without touching the filesystem.
pub fn parse_config(content: &str, origin: &Path) -> Result<super::AppConfig, ConfigError> {
    let parsed: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;
    validate_and_build(parsed)
}

fn expand(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).into_owned())
}

fn read_config(path: &Path) -> Result<super::AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_config(&content, path)
}

fn validate_and_build(parsed: RawConfig) -> Result<super::AppConfig, ConfigError> {
    let provider = ProviderSettings::try_from(parsed.provider)?;
    let retry = RetrySettings::try_from(parsed.retry)?;
    let executor = ExecutorSettings::try_from(parsed.executor)?;
    let vector_store = parsed
        .vector_store
        .map(VectorStoreSettings::try_from)
        .transpose()?;

    let mut tools = Vec::with_capacity(parsed.tools.len());
    for (name, raw) in parsed.tools {
        tools.push(ToolSettings::from_raw(&name, raw)?);
    }

    Ok(super::AppConfig {
        provider,
        retry,
        executor,
        vector_store,
        tools,
    })
}
