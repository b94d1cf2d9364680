//! Error taxonomy for agsval.
//!
//! External tool failures are never errors here: they are classified and
//! reported. These variants cover violations of the crate's own preconditions.

use std::path::PathBuf;

/// Errors produced while locating an undecodable byte.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    #[error("byte offset {offset} is outside file of {len} bytes")]
    OffsetOutOfRange { offset: u64, len: u64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// agsval domain errors.
#[derive(Debug, thiserror::Error)]
pub enum AgsvalError {
    #[error("cannot read input file {path}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input path has no file name: {0}")]
    InvalidInputPath(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for agsval operations.
pub type Result<T> = std::result::Result<T, AgsvalError>;
