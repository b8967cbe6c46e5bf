//! Application constants
//!
//! Single source of truth for paths and other constants.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/biotask.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

/// Total token window of the legacy completion model family
pub const DEFAULT_CONTEXT_WINDOW: usize = 4097;

/// Token window of the chat model
pub const DEFAULT_CHAT_CONTEXT_WINDOW: usize = 4096;

/// Upper bound on a single backoff delay, in seconds
pub const DEFAULT_MAX_DELAY_SECS: u64 = 50;

/// Metadata field a stored task result lives under in the vector index
pub const RESULT_METADATA_KEY: &str = "Result";

/// Question asked of the document index when none is given
pub const DEFAULT_SUMMARY_QUESTION: &str =
    "Create an executive summary of the information. Do not include any further instruction.";
