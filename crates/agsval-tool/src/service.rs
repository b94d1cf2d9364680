//! Validation and conversion requests.
//!
//! Each request invokes the tool once, classifies the outcome and renders
//! the report. Tool failures always end in a report; only the crate's own
//! preconditions (a readable input file) produce errors.

use std::path::{Path, PathBuf};

use agsval_core::obs::{emit_classified, emit_partial_output_removed};
use agsval_core::{
    classify_conversion, classify_validation, log_is_valid, AgsvalError, Classification, Clock,
    Operation, ReportFormatter, RequestSpan, Result, SystemClock,
};
use futures::future::join_all;
use tracing::{info, warn, Instrument};

use crate::invoker::ToolInvoker;

/// Name of the sidecar log inside the request's temporary directory.
pub const LOG_FILE_NAME: &str = "output.log";

/// Outcome of one validation request.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub file_name: String,
    pub classification: Classification,
    pub report: String,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        log_is_valid(&self.report)
    }
}

/// Outcome of one conversion request.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub file_name: String,
    pub output: Option<PathBuf>,
    pub classification: Classification,
    pub report: String,
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| AgsvalError::InvalidInputPath(path.to_path_buf()))
}

async fn input_size(path: &Path) -> Result<u64> {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.len())
        .map_err(|source| AgsvalError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        })
}

/// Read the sidecar log; absent when the tool did not write one.
async fn read_log(path: &Path) -> Option<String> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(event = "validate.log_unreadable", path = %path.display(), error = %e);
            None
        }
    }
}

/// Runs the checker and reports on the result.
pub struct Validator<I: ToolInvoker, C: Clock = SystemClock> {
    invoker: I,
    formatter: ReportFormatter<C>,
}

impl<I: ToolInvoker> Validator<I, SystemClock> {
    pub fn new(invoker: I) -> Self {
        Self::with_clock(invoker, SystemClock)
    }
}

impl<I: ToolInvoker, C: Clock> Validator<I, C> {
    pub fn with_clock(invoker: I, clock: C) -> Self {
        Self {
            invoker,
            formatter: ReportFormatter::new(clock),
        }
    }

    /// Validate `input` and return the report text.
    pub async fn validate(&self, input: &Path) -> Result<String> {
        Ok(self.validate_detailed(input).await?.report)
    }

    /// Whether the checker reports `input` as passing every rule.
    pub async fn is_valid(&self, input: &Path) -> Result<bool> {
        Ok(log_is_valid(&self.validate(input).await?))
    }

    /// Validate several files concurrently, preserving input order.
    pub async fn validate_many(&self, inputs: &[PathBuf]) -> Vec<Result<ValidationReport>> {
        join_all(inputs.iter().map(|input| self.validate_detailed(input))).await
    }

    /// Validate `input` and return the classification alongside the report.
    pub async fn validate_detailed(&self, input: &Path) -> Result<ValidationReport> {
        let file_name = file_name_of(input)?;
        let request = RequestSpan::new(Operation::Validate, &file_name);

        async move {
            info!(event = "validate.started");
            let filesize = input_size(input).await?;

            let workdir = tempfile::tempdir()?;
            let log_path = workdir.path().join(LOG_FILE_NAME);

            let outcome = self
                .invoker
                .check(input, &log_path)
                .await
                .with_log(read_log(&log_path).await);

            let classification = classify_validation(&outcome, input);
            emit_classified(Operation::Validate, &classification);

            let report = if classification.uses_template {
                self.formatter
                    .format(&file_name, filesize, &classification.message)
            } else {
                classification.message.clone()
            };

            Ok::<_, AgsvalError>(ValidationReport {
                file_name,
                classification,
                report,
            })
        }
        .instrument(request.span())
        .await
    }
}

/// Extension of the converted file: spreadsheets become AGS, everything
/// else becomes a spreadsheet.
pub fn converted_extension(input: &Path) -> &'static str {
    match input.extension().and_then(|e| e.to_str()) {
        Some("xlsx") => "ags",
        _ => "xlsx",
    }
}

/// Path of the converted file for `input` inside `results_dir`.
pub fn converted_path(input: &Path, results_dir: &Path) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .ok_or_else(|| AgsvalError::InvalidInputPath(input.to_path_buf()))?;
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(converted_extension(input));
    Ok(results_dir.join(name))
}

/// Remove a partially written output; a missing file is not an error.
async fn remove_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => emit_partial_output_removed(path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(event = "convert.partial_remove_failed", path = %path.display(), error = %e),
    }
}

/// Runs the converter and reports on the result.
pub struct Converter<I: ToolInvoker, C: Clock = SystemClock> {
    invoker: I,
    formatter: ReportFormatter<C>,
}

impl<I: ToolInvoker> Converter<I, SystemClock> {
    pub fn new(invoker: I) -> Self {
        Self::with_clock(invoker, SystemClock)
    }
}

impl<I: ToolInvoker, C: Clock> Converter<I, C> {
    pub fn with_clock(invoker: I, clock: C) -> Self {
        Self {
            invoker,
            formatter: ReportFormatter::new(clock),
        }
    }

    /// Convert `input` into `results_dir`.
    ///
    /// Returns the converted file (none on failure) and the report text.
    pub async fn convert(
        &self,
        input: &Path,
        results_dir: &Path,
    ) -> Result<(Option<PathBuf>, String)> {
        let report = self.convert_detailed(input, results_dir).await?;
        Ok((report.output, report.report))
    }

    pub async fn convert_detailed(
        &self,
        input: &Path,
        results_dir: &Path,
    ) -> Result<ConversionReport> {
        let file_name = file_name_of(input)?;
        let request = RequestSpan::new(Operation::Convert, &file_name);

        async move {
            let converted = converted_path(input, results_dir)?;
            let converted_name = file_name_of(&converted)?;
            info!(event = "convert.started", output = %converted_name);

            let filesize = input_size(input).await?;
            tokio::fs::create_dir_all(results_dir).await?;

            let outcome = self.invoker.convert(input, &converted).await;
            let classification = classify_conversion(&outcome, &file_name, &converted_name);
            emit_classified(Operation::Convert, &classification);

            let output = if classification.kind.is_failure() {
                remove_partial(&converted).await;
                None
            } else {
                Some(converted)
            };

            let report = self
                .formatter
                .format(&file_name, filesize, &classification.message);

            Ok::<_, AgsvalError>(ConversionReport {
                file_name,
                output,
                classification,
                report,
            })
        }
        .instrument(request.span())
        .await
    }
}
