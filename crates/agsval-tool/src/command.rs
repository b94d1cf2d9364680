//! `ags4_cli` command definitions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Invocations of the external `ags4_cli` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "command")]
pub enum ToolCommand {
    /// ags4_cli check <input> -o <log>
    Check { input: PathBuf, log: PathBuf },

    /// ags4_cli convert <input> <output>
    Convert { input: PathBuf, output: PathBuf },
}

impl ToolCommand {
    /// Get the command name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            ToolCommand::Check { .. } => "check",
            ToolCommand::Convert { .. } => "convert",
        }
    }

    /// Arguments following the executable.
    pub fn args(&self) -> Vec<String> {
        match self {
            ToolCommand::Check { input, log } => vec![
                "check".to_string(),
                path_arg(input),
                "-o".to_string(),
                path_arg(log),
            ],
            ToolCommand::Convert { input, output } => {
                vec!["convert".to_string(), path_arg(input), path_arg(output)]
            }
        }
    }

    /// Whether the command may stop to ask about renaming duplicate headers.
    pub fn prompts_for_rename(&self) -> bool {
        matches!(self, ToolCommand::Check { .. })
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// A fully resolved process invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    /// Human-readable name used in logs and errors.
    pub name: String,

    /// Command to execute (first element is executable).
    pub command: Vec<String>,

    /// Text written to stdin before it is closed.
    pub stdin: Option<String>,

    /// Timeout in seconds (0 = wait indefinitely).
    pub timeout_secs: u64,
}

impl Invocation {
    /// Create an invocation of an arbitrary command.
    pub fn custom(name: impl Into<String>, command: Vec<String>, timeout_secs: u64) -> Self {
        Self {
            name: name.into(),
            command,
            stdin: None,
            timeout_secs,
        }
    }

    /// Feed `input` to the process on stdin.
    pub fn with_stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_args() {
        let cmd = ToolCommand::Check {
            input: PathBuf::from("data/example1.ags"),
            log: PathBuf::from("/tmp/x/output.log"),
        };
        assert_eq!(cmd.name(), "check");
        assert_eq!(
            cmd.args(),
            vec!["check", "data/example1.ags", "-o", "/tmp/x/output.log"]
        );
        assert!(cmd.prompts_for_rename());
    }

    #[test]
    fn test_convert_args() {
        let cmd = ToolCommand::Convert {
            input: PathBuf::from("example1.ags"),
            output: PathBuf::from("results/example1.xlsx"),
        };
        assert_eq!(cmd.name(), "convert");
        assert_eq!(
            cmd.args(),
            vec!["convert", "example1.ags", "results/example1.xlsx"]
        );
        assert!(!cmd.prompts_for_rename());
    }

    #[test]
    fn test_invocation_custom() {
        let inv = Invocation::custom("echo", vec!["echo".to_string(), "hi".to_string()], 5)
            .with_stdin("n");
        assert_eq!(inv.name, "echo");
        assert_eq!(inv.timeout_secs, 5);
        assert_eq!(inv.stdin.as_deref(), Some("n"));
    }
}
