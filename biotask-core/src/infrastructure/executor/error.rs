use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("failed to start interpreter '{interpreter}': {source}")]
    Spawn {
        interpreter: String,
        #[source]
        source: io::Error,
    },
    #[error("i/o error talking to the interpreter: {source}")]
    Io {
        #[source]
        source: io::Error,
    },
    #[error("generated code raised an exception (exit status {status:?}): {stderr}")]
    Raised { status: Option<i32>, stderr: String },
    #[error("generated code finished without binding `ret`")]
    MissingResult,
    #[error("interpreter output could not be decoded: {reason}")]
    InvalidOutput { reason: String },
    #[error("generated code did not finish within {after:?}")]
    TimedOut { after: Duration },
}

impl ExecutionError {
    /// Stable tag for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ExecutionError::Spawn { .. } => "spawn",
            ExecutionError::Io { .. } => "io",
            ExecutionError::Raised { .. } => "raised",
            ExecutionError::MissingResult => "missing_result",
            ExecutionError::InvalidOutput { .. } => "invalid_output",
            ExecutionError::TimedOut { .. } => "timed_out",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ExecutionError::Spawn { interpreter, .. } => format!(
                "Could not start '{interpreter}'. Check [executor].interpreter in the configuration."
            ),
            ExecutionError::Raised { stderr, .. } => {
                let last = stderr.lines().last().unwrap_or("unknown error");
                format!("The generated code failed: {last}")
            }
            ExecutionError::MissingResult => {
                "The generated code ran but did not assign its answer to `ret`.".to_string()
            }
            ExecutionError::TimedOut { after } => {
                format!("The generated code was stopped after {}s.", after.as_secs())
            }
            other => other.to_string(),
        }
    }
}
