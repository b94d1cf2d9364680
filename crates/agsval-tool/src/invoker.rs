//! The external tool seam.
//!
//! Classification only ever sees a terminal [`ProcessOutcome`]; prompt
//! answering, timeouts and spawn failures are handled behind this trait.

use std::path::Path;
use std::sync::Arc;

use agsval_core::obs::emit_tool_finished;
use agsval_core::ProcessOutcome;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::command::ToolCommand;
use crate::config::ToolConfig;
use crate::runner::ToolRunner;

/// Backend that checks and converts AGS4 files.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Check `input`, possibly writing a sidecar log to `log`.
    async fn check(&self, input: &Path, log: &Path) -> ProcessOutcome;

    /// Convert `input` into `output`, possibly writing `output`.
    async fn convert(&self, input: &Path, output: &Path) -> ProcessOutcome;
}

#[async_trait]
impl<T: ToolInvoker + ?Sized> ToolInvoker for &T {
    async fn check(&self, input: &Path, log: &Path) -> ProcessOutcome {
        (**self).check(input, log).await
    }

    async fn convert(&self, input: &Path, output: &Path) -> ProcessOutcome {
        (**self).convert(input, output).await
    }
}

#[async_trait]
impl<T: ToolInvoker + ?Sized> ToolInvoker for Arc<T> {
    async fn check(&self, input: &Path, log: &Path) -> ProcessOutcome {
        (**self).check(input, log).await
    }

    async fn convert(&self, input: &Path, output: &Path) -> ProcessOutcome {
        (**self).convert(input, output).await
    }
}

/// [`ToolInvoker`] backed by the `ags4_cli` executable.
#[derive(Debug, Clone, Default)]
pub struct Ags4Cli {
    config: ToolConfig,
}

impl Ags4Cli {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    async fn run(&self, command: ToolCommand) -> ProcessOutcome {
        let invocation = self.config.invocation(&command);
        debug!(event = "tool.started", tool = %invocation.name, command = ?invocation.command);

        match ToolRunner::execute(&invocation).await {
            Ok(run) => {
                emit_tool_finished(&run.name, run.exit_code, run.duration_ms);
                ProcessOutcome::new(run.exit_code, run.stdout, run.stderr)
            }
            Err(e) => {
                warn!(event = "tool.failed", tool = %invocation.name, error = %e);
                ProcessOutcome::failed(e.to_string())
            }
        }
    }
}

#[async_trait]
impl ToolInvoker for Ags4Cli {
    async fn check(&self, input: &Path, log: &Path) -> ProcessOutcome {
        self.run(ToolCommand::Check {
            input: input.to_path_buf(),
            log: log.to_path_buf(),
        })
        .await
    }

    async fn convert(&self, input: &Path, output: &Path) -> ProcessOutcome {
        self.run(ToolCommand::Convert {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        })
        .await
    }
}
