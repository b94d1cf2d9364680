//! Subprocess execution with a bounded wait.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::command::Invocation;
use crate::config::MIN_TIMEOUT_SECS;

/// Failures to run a tool to completion.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{name} has empty command")]
    EmptyCommand { name: String },

    #[error("failed to start {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{name} timed out after {secs} seconds")]
    Timeout { name: String, secs: u64 },

    #[error("io error while running {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result of a completed tool run.
#[derive(Debug, Clone)]
pub struct ToolRun {
    /// Invocation name.
    pub name: String,

    /// Exit code (-1 when terminated by a signal).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

impl ToolRun {
    /// Whether the run exited with code 0.
    pub fn passed(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs invocations as child processes.
pub struct ToolRunner;

impl ToolRunner {
    /// Execute `invocation` and capture its output.
    ///
    /// A timed-out child is killed.
    pub async fn execute(invocation: &Invocation) -> Result<ToolRun, ToolError> {
        let start = Instant::now();
        let name = invocation.name.clone();

        let Some((exe, args)) = invocation.command.split_first() else {
            return Err(ToolError::EmptyCommand { name });
        };

        let mut child = Command::new(exe)
            .args(args)
            .stdin(if invocation.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ToolError::Spawn {
                name: name.clone(),
                source,
            })?;

        if let (Some(input), Some(mut stdin)) = (invocation.stdin.as_deref(), child.stdin.take()) {
            // The tool may exit without reading stdin.
            if let Err(e) = stdin.write_all(input.as_bytes()).await {
                debug!(event = "tool.stdin_closed", tool = %name, error = %e);
            }
        }

        let wait = child.wait_with_output();
        let secs = invocation.timeout_secs.max(MIN_TIMEOUT_SECS);
        let waited = tokio::time::timeout(Duration::from_secs(secs), wait)
            .await
            .map_err(|_| ToolError::Timeout {
                name: name.clone(),
                secs,
            })?;
        let output = waited.map_err(|source| ToolError::Io {
            name: name.clone(),
            source,
        })?;

        Ok(ToolRun {
            name,
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(name: &str, script: &str, timeout_secs: u64) -> Invocation {
        Invocation::custom(
            name,
            vec!["sh".to_string(), "-c".to_string(), script.to_string()],
            timeout_secs,
        )
    }

    #[test]
    fn test_tool_run_passed() {
        let run = ToolRun {
            name: "ags4_cli check".to_string(),
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
            duration_ms: 10,
        };
        assert!(run.passed());
    }

    #[tokio::test]
    async fn test_execute_simple_command() {
        let inv = Invocation::custom("echo", vec!["echo".to_string(), "hello".to_string()], 60);
        let run = ToolRunner::execute(&inv).await.expect("execute failed");
        assert!(run.passed());
        assert!(run.stdout.contains("hello"));
    }

    #[tokio::test]
    async fn test_execute_failing_command_captures_stderr() {
        let run = ToolRunner::execute(&sh("fail", "echo oops >&2; exit 3", 60))
            .await
            .expect("execute failed");
        assert_eq!(run.exit_code, 3);
        assert_eq!(run.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn test_stdin_is_fed_and_closed() {
        let inv = sh("read", "read answer; echo \"got:$answer\"", 60).with_stdin("n");
        let run = ToolRunner::execute(&inv).await.expect("execute failed");
        assert_eq!(run.stdout.trim(), "got:n");
    }

    #[tokio::test]
    async fn test_timeout_is_error() {
        let err = ToolRunner::execute(&sh("sleepy", "sleep 5", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Timeout { secs: 1, .. }));
        assert_eq!(err.to_string(), "sleepy timed out after 1 seconds");
    }

    #[tokio::test]
    async fn test_zero_timeout_still_bounded() {
        let err = ToolRunner::execute(&sh("sleepy", "sleep 5", 0))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Timeout { secs: 1, .. }));
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let inv = Invocation::custom(
            "ags4_cli check",
            vec!["/nonexistent/ags4_cli".to_string()],
            5,
        );
        let err = ToolRunner::execute(&inv).await.unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_empty_command_is_error() {
        let err = ToolRunner::execute(&Invocation::custom("empty", vec![], 5))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::EmptyCommand { .. }));
    }
}
