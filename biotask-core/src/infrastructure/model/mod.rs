//! Model infrastructure module
//!
//! # Structure
//! - `types` - Request, Response, Error types
//! - `traits` - ModelProvider trait
//! - `tokens` - tokenizer-backed prompt budget
//! - `retry` - exponential backoff policy
//! - `clients` - OpenAI-compatible HTTP client

#[cfg(feature = "http-providers")]
pub mod clients;
pub mod retry;
pub mod tokens;
pub mod traits;
pub mod types;

// Re-exports for convenience
#[cfg(feature = "http-providers")]
pub use clients::OpenAIClient;
pub use retry::{RetryPolicy, Transient};
pub use tokens::{PromptTooLong, TokenBudget, TokenCounter, TokenizerError};
pub use traits::ModelProvider;
pub use types::{
    ChatRequest, CompletionParams, CompletionRequest, EmbeddingRequest, ModelError, ModelResponse,
};
