//! agsval core library
//!
//! Classifies the output of AGS4 checking and conversion runs and renders
//! it into a consistent report:
//! - locating undecodable bytes as line and column
//! - rendering the fixed report template
//! - deciding whether a run succeeded and what to tell the user

pub mod classify;
pub mod domain;
pub mod locator;
pub mod obs;
pub mod patterns;
pub mod report;
pub mod response;
pub mod telemetry;

pub use classify::{classify_conversion, classify_validation, log_is_valid};
pub use domain::{AgsvalError, Classification, LocateError, OutcomeKind, ProcessOutcome, Result};
pub use locator::{locate, locate_in_bytes, EncodingErrorLocation};
pub use obs::{Operation, RequestSpan};
pub use report::{render, Clock, FixedClock, ReportFormatter, SystemClock, TIME_FORMAT};
pub use response::{ErrorDetail, ErrorResponse, MinimalResponse, Validation, ValidationResponse};
pub use telemetry::init_tracing;

/// agsval version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
