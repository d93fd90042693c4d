//! Error types for speleodraw

use std::io;
use thiserror::Error;

/// Main error type for decoding, projecting and assembling survey data
#[derive(Debug, Error)]
pub enum FormatError {
    /// IO error while draining a caller-supplied byte source
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Signature or version line not recognized
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A read went past the end of the buffer
    #[error("Truncated data at offset {offset:#X}: needed {needed} byte(s), {available} available")]
    TruncatedData {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A record is structurally invalid
    #[error("Corrupt record at offset {offset:#X}: {detail}")]
    CorruptRecord { offset: usize, detail: String },

    /// A leg names a station that was never decoded
    #[error("Dangling reference at offset {offset:#X}: {detail}")]
    DanglingReference { offset: usize, detail: String },

    /// Projection or assembly parameter out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for speleodraw operations
pub type Result<T> = std::result::Result<T, FormatError>;

impl FormatError {
    /// Shorthand for a [`FormatError::CorruptRecord`].
    pub fn corrupt(offset: usize, detail: impl Into<String>) -> Self {
        FormatError::CorruptRecord {
            offset,
            detail: detail.into(),
        }
    }

    /// Byte offset the error refers to, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            FormatError::TruncatedData { offset, .. }
            | FormatError::CorruptRecord { offset, .. }
            | FormatError::DanglingReference { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
