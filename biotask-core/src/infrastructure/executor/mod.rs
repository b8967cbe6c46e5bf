//! Execution of generated code

mod error;
mod python;

pub use error::ExecutionError;
pub use python::PythonExecutor;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Runs a code string and returns the value it produced.
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    async fn execute(&self, code: &str) -> Result<Value, ExecutionError>;
}

#[async_trait]
impl<E: CodeExecutor + ?Sized> CodeExecutor for Arc<E> {
    async fn execute(&self, code: &str) -> Result<Value, ExecutionError> {
        (**self).execute(code).await
    }
}
