//! Process outcomes and their classification.

use serde::{Deserialize, Serialize};

/// Terminal result of one external tool invocation.
///
/// Always complete: a timed-out or unspawnable tool is represented as a
/// failed outcome, never a pending one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOutcome {
    /// Exit code (0 = the tool ran without an internal fault).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Contents of the sidecar log, if the tool wrote one.
    #[serde(default)]
    pub log_contents: Option<String>,
}

impl ProcessOutcome {
    /// Outcome of a tool run that exited normally.
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            log_contents: None,
        }
    }

    /// Outcome standing in for a tool that could not be run to completion.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::new(-1, String::new(), reason)
    }

    /// Attach the sidecar log contents.
    pub fn with_log(mut self, log: Option<String>) -> Self {
        self.log_contents = log;
        self
    }

    /// Whether the process exited with code 0.
    pub fn exited_cleanly(&self) -> bool {
        self.exit_code == 0
    }
}

/// Which classification branch produced a [`Classification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum OutcomeKind {
    /// Tool exited non-zero or never completed.
    ToolInvocationFailure,

    /// Tool exited non-zero because the input could not be decoded.
    EncodingFailure,

    /// Tool ran but refused the input.
    InputRejected,

    /// Log opens with a bare error count and omits file metadata.
    ErrorSummary { errors: u64 },

    /// Log absent or of an unrecognised shape.
    MalformedLog,

    /// Log is a complete report and is passed through.
    Passed,

    /// Conversion produced an output file.
    Converted,
}

impl OutcomeKind {
    /// Whether this outcome reports a failure of the run.
    pub fn is_failure(&self) -> bool {
        !matches!(self, OutcomeKind::Passed | OutcomeKind::Converted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::ToolInvocationFailure => "tool_invocation_failure",
            OutcomeKind::EncodingFailure => "encoding_failure",
            OutcomeKind::InputRejected => "input_rejected",
            OutcomeKind::ErrorSummary { .. } => "error_summary",
            OutcomeKind::MalformedLog => "malformed_log",
            OutcomeKind::Passed => "passed",
            OutcomeKind::Converted => "converted",
        }
    }
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision made over a single [`ProcessOutcome`].
///
/// When `uses_template` is false, `message` is the complete report and the
/// formatter is bypassed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub kind: OutcomeKind,
    pub uses_template: bool,
    pub message: String,
}

impl Classification {
    /// A classification whose message is wrapped in the report template.
    pub fn templated(kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            uses_template: true,
            message: message.into(),
        }
    }

    /// A classification whose message is already the final report.
    pub fn passthrough(kind: OutcomeKind, report: impl Into<String>) -> Self {
        Self {
            kind,
            uses_template: false,
            message: report.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_outcome_is_terminal_error() {
        let outcome = ProcessOutcome::failed("ags4_cli timed out after 30 seconds");
        assert_eq!(outcome.exit_code, -1);
        assert!(!outcome.exited_cleanly());
        assert!(outcome.stdout.is_empty());
        assert!(outcome.log_contents.is_none());
    }

    #[test]
    fn test_with_log_attaches_contents() {
        let outcome = ProcessOutcome::new(0, "", "").with_log(Some("log".to_string()));
        assert!(outcome.exited_cleanly());
        assert_eq!(outcome.log_contents.as_deref(), Some("log"));
    }

    #[test]
    fn test_outcome_kind_failure_flags() {
        assert!(OutcomeKind::ToolInvocationFailure.is_failure());
        assert!(OutcomeKind::ErrorSummary { errors: 2 }.is_failure());
        assert!(OutcomeKind::MalformedLog.is_failure());
        assert!(!OutcomeKind::Passed.is_failure());
        assert!(!OutcomeKind::Converted.is_failure());
    }

    #[test]
    fn test_outcome_kind_serializes_tagged() {
        let json = serde_json::to_value(OutcomeKind::ErrorSummary { errors: 6 }).unwrap();
        assert_eq!(json["kind"], "error_summary");
        assert_eq!(json["errors"], 6);
        assert_eq!(OutcomeKind::EncodingFailure.to_string(), "encoding_failure");
    }
}
