//! Named patterns for reading `ags4_cli` output.
//!
//! Each pattern the classifiers depend on lives here, compiled once, with a
//! helper returning `Option` so that a non-matching text is an explicit case.

use regex::Regex;
use std::sync::LazyLock;

/// Marker printed to stderr when the input cannot be decoded.
pub const UNICODE_DECODE_MARKER: &str = "UnicodeDecodeError:";

/// Stdout prefix used by the tool when it refuses the input.
pub const INPUT_REJECTED_PREFIX: &str = "ERROR: ";

/// Text the checker writes when a file has no rule violations.
pub const ALL_CHECKS_PASSED: &str = "All checks passed!";

/// Byte offset reported by a decode failure, e.g. `in position 1042:` or the
/// range form `in position 3-4:`, where the first byte of the range is taken.
pub static DECODE_POSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"in position (\d+)(?:-\d+)?:").expect("valid decode position pattern")
});

/// Bare error count at the very start of a log, e.g. `6 error(s) found in file!`.
pub static ERROR_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A(\d+) error\(s\) found in file").expect("valid error count pattern")
});

/// Metadata header or per-rule section line of a complete checker log.
pub static FULL_LOG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:File Name:|Rule \w+)").expect("valid full log pattern")
});

/// Whether stderr reports a decode failure.
pub fn has_decode_error(stderr: &str) -> bool {
    stderr.contains(UNICODE_DECODE_MARKER)
}

/// Byte offset of a decode failure, if stderr reports one.
pub fn decode_position(stderr: &str) -> Option<u64> {
    DECODE_POSITION
        .captures(stderr)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Leading error count of a summary log.
pub fn error_count(log: &str) -> Option<u64> {
    ERROR_COUNT
        .captures(log)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Whether stdout carries a rejection from the tool.
pub fn is_rejection(stdout: &str) -> bool {
    stdout.starts_with(INPUT_REJECTED_PREFIX)
}

/// Whether a log looks like a complete checker report.
pub fn is_full_log(log: &str) -> bool {
    log.contains(ALL_CHECKS_PASSED) || FULL_LOG.is_match(log)
}
