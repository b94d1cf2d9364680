//! Domain model: process outcomes, classifications and errors.

pub mod error;
pub mod outcome;

pub use error::{AgsvalError, LocateError, Result};
pub use outcome::{Classification, OutcomeKind, ProcessOutcome};
