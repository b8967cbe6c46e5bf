//! Out-of-process Python executor.
//!
//! The code is piped into a fresh interpreter running a small harness that
//! executes it in an isolated scope and prints the JSON encoding of `ret`
//! after a marker. Nothing runs inside this process.

use super::CodeExecutor;
use super::error::ExecutionError;
use crate::config::ExecutorSettings;
use async_trait::async_trait;
use serde_json::Value;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

const RESULT_MARKER: &str = "__BIOTASK_RESULT__";

/// Exit status the harness uses when `ret` was never bound
const MISSING_RESULT_STATUS: i32 = 86;

const HARNESS: &str = r#"
import json
import sys

_source = sys.stdin.read()
_scope = {"__name__": "__biotask__"}
exec(compile(_source, "<generated>", "exec"), _scope)
if "ret" not in _scope:
    sys.exit(86)
_value = _scope["ret"]
if isinstance(_value, (bytes, bytearray)):
    _value = _value.decode("utf-8", "replace")
sys.stdout.write("\n__BIOTASK_RESULT__" + json.dumps(_value, default=str) + "\n")
sys.stdout.flush()
"#;

#[derive(Debug, Clone)]
pub struct PythonExecutor {
    interpreter: String,
    timeout: Duration,
}

impl PythonExecutor {
    pub fn new(interpreter: impl Into<String>, timeout: Duration) -> Self {
        Self {
            interpreter: interpreter.into(),
            timeout,
        }
    }

    pub fn from_settings(settings: &ExecutorSettings) -> Self {
        Self::new(settings.interpreter.clone(), settings.timeout())
    }

    async fn run(&self, code: &str) -> Result<Value, ExecutionError> {
        let mut command = Command::new(&self.interpreter);
        command
            .arg("-c")
            .arg(HARNESS)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|source| ExecutionError::Spawn {
            interpreter: self.interpreter.clone(),
            source,
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(code.as_bytes())
                .await
                .map_err(|source| ExecutionError::Io { source })?;
            stdin
                .shutdown()
                .await
                .map_err(|source| ExecutionError::Io { source })?;
        }

        // Dropping the child on timeout kills it.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| ExecutionError::Io { source })?,
            Err(_) => {
                return Err(ExecutionError::TimedOut {
                    after: self.timeout,
                });
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            if output.status.code() == Some(MISSING_RESULT_STATUS) {
                return Err(ExecutionError::MissingResult);
            }
            return Err(ExecutionError::Raised {
                status: output.status.code(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_result(&stdout)
    }
}

fn parse_result(stdout: &str) -> Result<Value, ExecutionError> {
    let encoded = stdout
        .lines()
        .rev()
        .find_map(|line| line.strip_prefix(RESULT_MARKER))
        .ok_or_else(|| ExecutionError::InvalidOutput {
            reason: "result marker not found".to_string(),
        })?;
    serde_json::from_str(encoded).map_err(|err| ExecutionError::InvalidOutput {
        reason: err.to_string(),
    })
}

#[async_trait]
impl CodeExecutor for PythonExecutor {
    async fn execute(&self, code: &str) -> Result<Value, ExecutionError> {
        debug!(
            interpreter = self.interpreter.as_str(),
            bytes = code.len(),
            "Executing generated code"
        );
        match self.run(code).await {
            Ok(value) => {
                info!("Generated code produced a result");
                Ok(value)
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "Generated code failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// `None` (with a notice on stderr) when no interpreter is installed.
    fn python() -> Option<PythonExecutor> {
        let available = std::process::Command::new("python3")
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false);
        if !available {
            eprintln!("skipping: python3 is not on PATH");
            return None;
        }
        Some(PythonExecutor::new("python3", Duration::from_secs(20)))
    }

    #[test]
    fn parse_result_takes_last_marker_line() {
        let stdout = "noise\n__BIOTASK_RESULT__1\nmore\n__BIOTASK_RESULT__{\"a\": [1, 2]}\n";
        assert_eq!(parse_result(stdout).expect("parsed"), json!({"a": [1, 2]}));
    }

    #[test]
    fn parse_result_without_marker_is_invalid_output() {
        let err = parse_result("hello\n").expect_err("no marker");
        assert_eq!(err.kind(), "invalid_output");
    }

    #[tokio::test]
    async fn missing_interpreter_is_a_spawn_error() {
        let executor = PythonExecutor::new("biotask-no-such-interpreter", Duration::from_secs(1));
        let err = executor.execute("ret = 1").await.expect_err("spawn fails");
        assert!(matches!(err, ExecutionError::Spawn { .. }));
        assert_eq!(err.kind(), "spawn");
    }

    #[tokio::test]
    async fn returns_value_bound_to_ret() {
        let Some(executor) = python() else { return };
        let value = executor.execute("ret = 42").await.expect("runs");
        assert_eq!(value, json!(42));
    }

    #[tokio::test]
    async fn printed_output_does_not_disturb_result() {
        let Some(executor) = python() else { return };
        let code = "print('working')\nitems = [x * 2 for x in range(3)]\nret = {'items': items}";
        let value = executor.execute(code).await.expect("runs");
        assert_eq!(value, json!({"items": [0, 2, 4]}));
    }

    #[tokio::test]
    async fn exception_is_tagged_not_propagated() {
        let Some(executor) = python() else { return };
        let err = executor
            .execute("raise ValueError('bad gene id')")
            .await
            .expect_err("raises");
        assert_eq!(err.kind(), "raised");
        match err {
            ExecutionError::Raised { stderr, .. } => assert!(stderr.contains("bad gene id")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn code_without_ret_is_missing_result() {
        let Some(executor) = python() else { return };
        let err = executor.execute("x = 1").await.expect_err("no ret");
        assert!(matches!(err, ExecutionError::MissingResult));
    }

    #[tokio::test]
    async fn slow_code_times_out() {
        let Some(_) = python() else { return };
        let executor = PythonExecutor::new("python3", Duration::from_millis(300));
        let err = executor
            .execute("import time\ntime.sleep(10)\nret = 1")
            .await
            .expect_err("times out");
        assert!(matches!(err, ExecutionError::TimedOut { .. }));
    }
}
