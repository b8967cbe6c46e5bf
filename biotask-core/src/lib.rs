//! Task routing for biomedical API questions.
//!
//! A task string is matched against the known tool keywords, turned into a
//! code-generation prompt carrying the tool documentation, sent to an
//! OpenAI-compatible completion endpoint and, optionally, the returned code
//! is executed out of process and judged by a second completion.
//!
//! # Structure
//! - `config` - TOML configuration, credentials and the pipeline context
//! - `domain` - tools, messages and the world model
//! - `infrastructure` - model provider, tokenizer, retry, vector store, executor
//! - `application` - selector, prompt assembler, completion client, pipeline

pub mod application;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::{
    completion, document_index, errors, knowledge, parser, pipeline, prompt, selector, validator,
};
pub use config::{AppConfig, ConfigError, Credentials, PipelineContext};
pub use domain::{tool, types, world};
pub use infrastructure::{executor, model, vector};
