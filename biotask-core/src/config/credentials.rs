use super::error::ConfigError;
use super::loader::ensure_env_loaded;
use super::provider::ProviderSettings;
use std::env;
use std::fmt;

/// Provider API key and organization, read once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub organization: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            organization: organization.into(),
        }
    }

    /// Read the variables named in `settings` from the process environment.
    pub fn from_env(settings: &ProviderSettings) -> Result<Self, ConfigError> {
        ensure_env_loaded();
        Self::from_lookup(settings, |name| env::var(name).ok())
    }

    /// Resolve credentials through an arbitrary lookup function.
    pub fn from_lookup<F>(settings: &ProviderSettings, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = require(&lookup, &settings.api_key_env)?;
        let organization = require(&lookup, &settings.organization_env)?;
        Ok(Self {
            api_key,
            organization,
        })
    }
}

fn require<F>(lookup: &F, var: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::MissingEnv {
            var: var.to_string(),
        })
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("organization", &self.organization)
            .finish()
    }
}
