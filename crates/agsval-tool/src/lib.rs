//! agsval tool - AGS4 checking and conversion via `ags4_cli`
//!
//! Provides the external tool collaborator and request orchestration:
//! - Builds and runs `ags4_cli check` / `ags4_cli convert` with a timeout
//! - Turns every run into a terminal process outcome
//! - Classifies outcomes and renders the final reports

pub mod command;
pub mod config;
pub mod invoker;
pub mod runner;
pub mod service;

// Re-export key types
pub use command::{Invocation, ToolCommand};
pub use config::ToolConfig;
pub use invoker::{Ags4Cli, ToolInvoker};
pub use runner::{ToolError, ToolRun, ToolRunner};
pub use service::{
    converted_extension, converted_path, ConversionReport, Converter, ValidationReport, Validator,
};
