//! agsval - AGS4 validation and conversion
//!
//! The `agsval` command wraps `ags4_cli` and prints normalized reports.
//!
//! ## Commands
//!
//! - `validate`: check one or more files against the AGS4 rules
//! - `is-valid`: exit non-zero unless a file passes every check
//! - `convert`: convert between .ags and .xlsx

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use agsval_core::response::success_response;
use agsval_core::{ErrorResponse, ValidationResponse};
use agsval_tool::config::{ENV_CLI_BIN, ENV_TIMEOUT_SECS};
use agsval_tool::{Ags4Cli, ConversionReport, Converter, ToolConfig, ValidationReport, Validator};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "agsval")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate and convert AGS4 geotechnical data files", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Path to the ags4_cli executable
    #[arg(long, global = true, env = ENV_CLI_BIN)]
    ags4_cli: Option<String>,

    /// Seconds to wait for ags4_cli before giving up
    #[arg(
        long,
        global = true,
        env = ENV_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate AGS4 files and print their reports
    Validate {
        /// Files to validate
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Exit with status 1 unless the file passes every check
    IsValid {
        /// File to validate
        file: PathBuf,
    },

    /// Convert between .ags and .xlsx
    Convert {
        /// File to convert
        file: PathBuf,

        /// Directory for the converted file (default: alongside the input)
        #[arg(short, long)]
        results_dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn tool_config(&self) -> ToolConfig {
        let mut config = ToolConfig::from_env();
        if let Some(bin) = &self.ags4_cli {
            config = config.with_binary(bin.clone());
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(secs);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    agsval_core::init_tracing(cli.json, level);

    let tool = Ags4Cli::new(cli.tool_config());
    info!(binary = %tool.config().binary_path, "agsval starting");

    match cli.command {
        Commands::Validate { files, format } => cmd_validate(tool, &files, format).await,
        Commands::IsValid { file } => cmd_is_valid(tool, &file).await,
        Commands::Convert {
            file,
            results_dir,
            format,
        } => cmd_convert(tool, &file, results_dir.as_deref(), format).await,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Validate files concurrently and print each report
///
/// A file that cannot be read is reported on stderr; the remaining reports
/// are still printed and the command exits with a failure status.
async fn cmd_validate(tool: Ags4Cli, files: &[PathBuf], format: OutputFormat) -> Result<ExitCode> {
    let validator = Validator::new(tool);
    let results = validator.validate_many(files).await;

    let mut reports: Vec<ValidationReport> = Vec::with_capacity(results.len());
    let mut failed = 0usize;
    for (file, result) in files.iter().zip(results) {
        match result.with_context(|| format!("Failed to validate {}", file.display())) {
            Ok(report) => reports.push(report),
            Err(e) => {
                failed += 1;
                eprintln!("Error: {e:#}");
            }
        }
    }

    match format {
        OutputFormat::Text => {
            for (i, report) in reports.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("{}", report.report);
            }
        }
        OutputFormat::Json if !reports.is_empty() => {
            let self_ref = files
                .iter()
                .map(|f| f.display().to_string())
                .collect::<Vec<_>>()
                .join(",");
            print_json(&ValidationResponse::from_reports(
                self_ref,
                reports.iter().map(|r| r.report.as_str()),
            ))?;
        }
        OutputFormat::Json => {}
    }

    if failed > 0 {
        warn!(failed, total = files.len(), "some files could not be validated");
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Print whether a file is valid
async fn cmd_is_valid(tool: Ags4Cli, file: &Path) -> Result<ExitCode> {
    let valid = Validator::new(tool)
        .is_valid(file)
        .await
        .with_context(|| format!("Failed to validate {}", file.display()))?;

    if valid {
        println!("valid");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("invalid");
        Ok(ExitCode::FAILURE)
    }
}

#[derive(Serialize)]
struct ConversionOutput<'a, T: Serialize> {
    #[serde(flatten)]
    response: T,
    output: Option<&'a Path>,
    report: &'a str,
}

/// Convert a file and print the report
async fn cmd_convert(
    tool: Ags4Cli,
    file: &Path,
    results_dir: Option<&Path>,
    format: OutputFormat,
) -> Result<ExitCode> {
    let results_dir = match results_dir {
        Some(dir) => dir.to_path_buf(),
        None => file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let converted: ConversionReport = Converter::new(tool)
        .convert_detailed(file, &results_dir)
        .await
        .with_context(|| format!("Failed to convert {}", file.display()))?;

    let self_ref = file.display().to_string();
    match format {
        OutputFormat::Text => {
            println!("{}", converted.report);
            if let Some(output) = &converted.output {
                println!("\nOutput: {}", output.display());
            }
        }
        OutputFormat::Json if converted.classification.kind.is_failure() => {
            print_json(&ConversionOutput {
                response: ErrorResponse::from_classification(self_ref, &converted.classification),
                output: None,
                report: &converted.report,
            })?;
        }
        OutputFormat::Json => {
            print_json(&ConversionOutput {
                response: success_response(self_ref, &converted.classification),
                output: converted.output.as_deref(),
                report: &converted.report,
            })?;
        }
    }

    Ok(if converted.output.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
