pub mod app;
pub mod context;
pub mod credentials;
pub mod defaults;
pub mod error;
pub mod loader;
pub mod provider;
pub mod runtime;
pub mod store;
pub mod tool;

pub use crate::constants::CONFIG_PATH;

pub use app::AppConfig;
pub use context::PipelineContext;
pub use credentials::Credentials;
pub use error::ConfigError;
pub use provider::ProviderSettings;
pub use runtime::{ExecutorSettings, RetrySettings};
pub use store::VectorStoreSettings;
pub use tool::ToolSettings;
