use super::app::AppConfig;
use super::credentials::Credentials;
use super::error::ConfigError;

/// Configuration and credentials handed to every component at construction.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub config: AppConfig,
    pub credentials: Credentials,
}

impl PipelineContext {
    pub fn new(config: AppConfig, credentials: Credentials) -> Self {
        Self {
            config,
            credentials,
        }
    }

    /// Resolve credentials from the environment, failing fast when absent.
    pub fn from_env(config: AppConfig) -> Result<Self, ConfigError> {
        let credentials = Credentials::from_env(&config.provider)?;
        Ok(Self::new(config, credentials))
    }
}
