//! Classification of checker and converter outcomes.
//!
//! Both classifiers are ordered decision trees over one [`ProcessOutcome`];
//! the first matching branch wins.

use std::path::Path;

use tracing::{debug, warn};

use crate::domain::{Classification, OutcomeKind, ProcessOutcome};
use crate::locator;
use crate::patterns;

/// Classify the outcome of a validation run against `input`.
///
/// Precedence:
/// 1. non-zero exit (decode failures are located within `input`)
/// 2. stdout rejection
/// 3. log opening with a bare error count
/// 4. complete log, passed through as the report
///
/// A missing or unrecognised log is [`OutcomeKind::MalformedLog`].
pub fn classify_validation(outcome: &ProcessOutcome, input: &Path) -> Classification {
    if !outcome.exited_cleanly() {
        if patterns::has_decode_error(&outcome.stderr) {
            if let Some(message) = encoding_failure_message(&outcome.stderr, input) {
                return Classification::templated(OutcomeKind::EncodingFailure, message);
            }
        }
        return Classification::templated(
            OutcomeKind::ToolInvocationFailure,
            format!("ERROR: {}", outcome.stderr),
        );
    }

    if patterns::is_rejection(&outcome.stdout) {
        return Classification::templated(OutcomeKind::InputRejected, outcome.stdout.clone());
    }

    let Some(log) = outcome.log_contents.as_deref() else {
        let mut message = String::from("ERROR: checker produced no log output");
        if !outcome.stderr.is_empty() {
            message.push('\n');
            message.push_str(&outcome.stderr);
        }
        return Classification::templated(OutcomeKind::MalformedLog, message);
    };

    if let Some(errors) = patterns::error_count(log) {
        // Summary logs omit file metadata; the template adds it back.
        return Classification::templated(OutcomeKind::ErrorSummary { errors }, log);
    }

    if patterns::is_full_log(log) {
        return Classification::passthrough(OutcomeKind::Passed, log);
    }

    Classification::templated(
        OutcomeKind::MalformedLog,
        format!("ERROR: unrecognised checker log output\n\n{log}"),
    )
}

/// Classify the outcome of a conversion from `input_name` to `output_name`.
pub fn classify_conversion(
    outcome: &ProcessOutcome,
    input_name: &str,
    output_name: &str,
) -> Classification {
    if !outcome.exited_cleanly() {
        Classification::templated(
            OutcomeKind::ToolInvocationFailure,
            format!("ERROR: {}", outcome.stderr),
        )
    } else if patterns::is_rejection(&outcome.stdout) {
        Classification::templated(OutcomeKind::InputRejected, outcome.stdout.clone())
    } else {
        Classification::templated(
            OutcomeKind::Converted,
            format!("SUCCESS: {input_name} converted to {output_name}"),
        )
    }
}

/// Whether a validation report describes a valid file.
pub fn log_is_valid(report: &str) -> bool {
    report.contains(patterns::ALL_CHECKS_PASSED)
}

fn encoding_failure_message(stderr: &str, input: &Path) -> Option<String> {
    let Some(offset) = patterns::decode_position(stderr) else {
        warn!(event = "classify.decode_position_missing", "decode error without byte offset");
        return None;
    };

    match locator::locate(input, offset) {
        Ok(location) => {
            debug!(
                event = "classify.encoding_located",
                offset,
                line = location.line_number,
                column = location.column,
            );
            Some(location.message())
        }
        Err(e) => {
            warn!(event = "classify.locate_failed", offset, error = %e);
            None
        }
    }
}
