//! Request-scoped tracing for validation and conversion.
//!
//! Each request gets its own span carrying a fresh `request_id`; events
//! emitted while the request runs inherit it.

use tracing::{info, Span};
use uuid::Uuid;

use crate::domain::Classification;

/// Operation a request performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Validate,
    Convert,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Validate => "validate",
            Operation::Convert => "convert",
        }
    }
}

/// Span and identity of one request.
#[derive(Debug, Clone)]
pub struct RequestSpan {
    request_id: Uuid,
    span: Span,
}

impl RequestSpan {
    /// Create a span for `operation` on `file_name`.
    pub fn new(operation: Operation, file_name: &str) -> Self {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "agsval.request",
            request_id = %request_id,
            operation = operation.as_str(),
            file = %file_name,
        );
        Self { request_id, span }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// The span, for `Instrument::instrument`.
    pub fn span(&self) -> Span {
        self.span.clone()
    }
}

/// Emit event: a tool invocation finished.
pub fn emit_tool_finished(tool: &str, exit_code: i32, duration_ms: u64) {
    info!(event = "tool.finished", tool = %tool, exit_code, duration_ms);
}

/// Emit event: an outcome was classified.
pub fn emit_classified(operation: Operation, classification: &Classification) {
    info!(
        event = "request.classified",
        operation = operation.as_str(),
        kind = %classification.kind,
        uses_template = classification.uses_template,
    );
}

/// Emit event: a partial conversion output was removed.
pub fn emit_partial_output_removed(path: &std::path::Path) {
    info!(event = "convert.partial_removed", path = %path.display());
}
