//! Runtime configuration for the `ags4_cli` collaborator.

use serde::{Deserialize, Serialize};

use crate::command::{Invocation, ToolCommand};

/// Environment variable overriding the tool binary.
pub const ENV_CLI_BIN: &str = "AGSVAL_CLI_BIN";

/// Environment variable overriding the timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "AGSVAL_TIMEOUT_SECS";

/// Default ceiling on a single tool run.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Smallest accepted timeout. Every tool run is bounded.
pub const MIN_TIMEOUT_SECS: u64 = 1;

/// Configuration for invoking `ags4_cli`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolConfig {
    /// Path to the ags4_cli binary.
    pub binary_path: String,

    /// Timeout per invocation in seconds.
    pub timeout_secs: u64,

    /// Answer fed to the duplicate-header rename prompt.
    pub rename_prompt_answer: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            binary_path: "ags4_cli".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            rename_prompt_answer: "n".to_string(),
        }
    }
}

impl ToolConfig {
    /// Defaults overridden by `AGSVAL_CLI_BIN` and `AGSVAL_TIMEOUT_SECS`.
    ///
    /// An unparsable timeout is ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(bin) = lookup(ENV_CLI_BIN).filter(|b| !b.trim().is_empty()) {
            config.binary_path = bin;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs >= MIN_TIMEOUT_SECS => config.timeout_secs = secs,
                _ => tracing::warn!(
                    event = "config.invalid_timeout",
                    value = %raw,
                    "ignoring {}",
                    ENV_TIMEOUT_SECS
                ),
            }
        }
        config
    }

    pub fn with_binary(mut self, binary_path: impl Into<String>) -> Self {
        self.binary_path = binary_path.into();
        self
    }

    /// Set the timeout; values below [`MIN_TIMEOUT_SECS`] are raised to it.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs.max(MIN_TIMEOUT_SECS);
        self
    }

    /// Resolve `command` into a process invocation.
    pub fn invocation(&self, command: &ToolCommand) -> Invocation {
        let mut argv = vec![self.binary_path.clone()];
        argv.extend(command.args());

        let invocation = Invocation::custom(
            format!("ags4_cli {}", command.name()),
            argv,
            self.timeout_secs,
        );
        if command.prompts_for_rename() {
            invocation.with_stdin(self.rename_prompt_answer.clone())
        } else {
            invocation
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ToolConfig::default();
        assert_eq!(config.binary_path, "ags4_cli");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.rename_prompt_answer, "n");
    }

    #[test]
    fn test_env_overrides() {
        let config = ToolConfig::from_lookup(lookup(&[
            (ENV_CLI_BIN, "/opt/ags/bin/ags4_cli"),
            (ENV_TIMEOUT_SECS, "45"),
        ]));
        assert_eq!(config.binary_path, "/opt/ags/bin/ags4_cli");
        assert_eq!(config.timeout_secs, 45);
    }

    #[test]
    fn test_invalid_timeout_keeps_default() {
        let config = ToolConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")]));
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = ToolConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "0")]));
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(ToolConfig::default().with_timeout(0).timeout_secs, MIN_TIMEOUT_SECS);
    }

    #[test]
    fn test_blank_binary_keeps_default() {
        let config = ToolConfig::from_lookup(lookup(&[(ENV_CLI_BIN, "  ")]));
        assert_eq!(config.binary_path, "ags4_cli");
    }

    #[test]
    fn test_check_invocation_answers_prompt() {
        let config = ToolConfig::default().with_timeout(10);
        let inv = config.invocation(&ToolCommand::Check {
            input: PathBuf::from("a.ags"),
            log: PathBuf::from("out.log"),
        });
        assert_eq!(inv.command, vec!["ags4_cli", "check", "a.ags", "-o", "out.log"]);
        assert_eq!(inv.stdin.as_deref(), Some("n"));
        assert_eq!(inv.timeout_secs, 10);
        assert_eq!(inv.name, "ags4_cli check");
    }

    #[test]
    fn test_convert_invocation_has_no_stdin() {
        let inv = ToolConfig::default()
            .with_binary("/usr/bin/ags4_cli")
            .invocation(&ToolCommand::Convert {
                input: PathBuf::from("a.ags"),
                output: PathBuf::from("a.xlsx"),
            });
        assert_eq!(inv.command[0], "/usr/bin/ags4_cli");
        assert!(inv.stdin.is_none());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = ToolConfig::default().with_timeout(5);
        let json = serde_json::to_string(&config).unwrap();
        let back: ToolConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
