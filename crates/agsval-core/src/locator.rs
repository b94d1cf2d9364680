//! Locate an undecodable byte as a line and column.
//!
//! The checker reports decode failures as a raw byte offset. The file is
//! re-read as ISO-8859-1, which maps every byte to the code point of the
//! same value, so the scan itself never fails to decode.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::LocateError;

/// Position of an undecodable byte inside a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingErrorLocation {
    /// 1-indexed column of the offending byte.
    pub column: usize,

    /// 1-indexed line number.
    pub line_number: usize,

    /// Text of the current line up to the offending byte.
    pub line_prefix: String,

    /// The offending byte under the permissive decoding.
    pub character: char,
}

impl EncodingErrorLocation {
    /// Report body for this location.
    pub fn message(&self) -> String {
        format!(
            "ERROR: Unreadable character \"{}\" at position {} on line: {}\nStarting: {}\n\n",
            self.character, self.column, self.line_number, self.line_prefix
        )
    }
}

/// Decode bytes as ISO-8859-1.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Locate `byte_offset` within `bytes`.
pub fn locate_in_bytes(
    bytes: &[u8],
    byte_offset: u64,
) -> Result<EncodingErrorLocation, LocateError> {
    let len = bytes.len() as u64;
    let offset = usize::try_from(byte_offset)
        .ok()
        .filter(|&o| o < bytes.len())
        .ok_or(LocateError::OffsetOutOfRange {
            offset: byte_offset,
            len,
        })?;

    let upto = decode_latin1(&bytes[..offset]);
    let line_number = upto.matches('\n').count() + 1;
    let line_prefix = match upto.rfind('\n') {
        Some(idx) => upto[idx + 1..].to_string(),
        None => upto,
    };
    let column = line_prefix.chars().count() + 1;

    Ok(EncodingErrorLocation {
        column,
        line_number,
        line_prefix,
        character: char::from(bytes[offset]),
    })
}

/// Locate `byte_offset` within the file at `path`.
///
/// Reads at most `byte_offset + 1` bytes.
pub fn locate(path: &Path, byte_offset: u64) -> Result<EncodingErrorLocation, LocateError> {
    let file = File::open(path)?;
    let mut bytes = Vec::new();
    file.take(byte_offset.saturating_add(1))
        .read_to_end(&mut bytes)?;

    match locate_in_bytes(&bytes, byte_offset) {
        Err(LocateError::OffsetOutOfRange { offset, .. }) => {
            let len = std::fs::metadata(path)?.len();
            Err(LocateError::OffsetOutOfRange { offset, len })
        }
        other => other,
    }
}
