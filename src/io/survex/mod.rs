//! Survex 3D binary format support.
//!
//! Reads processed survey files written by Survex (and tools that emit the
//! same format) in versions 3 through 8 and produces a
//! [`Network`](crate::network::Network).
//!
//! # Module Structure
//!
//! - [`constants`]: signature, flag masks and length escapes
//! - [`preamble`]: textual header lines (nom)
//! - [`reader`]: bounds-checked field cursor
//! - [`dialect`]: per-version opcode tables
//! - [`prefix`]: label buffer as a survey-prefix stack
//! - [`pen`]: MOVE/LINE pen state machine
//! - [`decoder`]: item stream to network

pub mod constants;
pub mod decoder;
pub mod dialect;
pub mod pen;
pub mod preamble;
pub mod prefix;
pub mod reader;

pub use decoder::{DecoderConfiguration, NetworkDecoder};
pub use dialect::{Dialect, Opcode};
pub use preamble::Preamble;
pub use reader::SurvexReader;

use std::fmt;
use std::io::Read;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use rayon::prelude::*;

use crate::error::Result;
use crate::network::Network;

/// 3D format version, taken from the `vN` preamble line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatVersion {
    V3,
    V4,
    V5,
    V6,
    V7,
    V8,
}

impl FormatVersion {
    pub fn from_number(number: u32) -> Option<Self> {
        match number {
            3 => Some(Self::V3),
            4 => Some(Self::V4),
            5 => Some(Self::V5),
            6 => Some(Self::V6),
            7 => Some(Self::V7),
            8 => Some(Self::V8),
            _ => None,
        }
    }

    pub fn number(&self) -> u32 {
        match self {
            Self::V3 => 3,
            Self::V4 => 4,
            Self::V5 => 5,
            Self::V6 => 6,
            Self::V7 => 7,
            Self::V8 => 8,
        }
    }

    /// Encoding of the title, timestamp and label bytes.
    pub fn text_encoding(&self) -> &'static Encoding {
        match self {
            Self::V8 => UTF_8,
            _ => WINDOWS_1252,
        }
    }

    /// Version 8 stores a file flags byte after the timestamp line.
    pub fn has_file_flags(&self) -> bool {
        *self >= Self::V8
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Decode an opened file with the default configuration.
pub fn decode(reader: SurvexReader) -> Result<Network> {
    NetworkDecoder::new(reader).decode()
}

/// Decode a complete 3D file held in memory.
pub fn decode_bytes(bytes: &[u8]) -> Result<Network> {
    decode(SurvexReader::open(bytes)?)
}

/// Decode a 3D file from any byte source.
pub fn decode_stream<R: Read>(source: R) -> Result<Network> {
    decode(SurvexReader::from_stream(source)?)
}

/// Decode several independent files in parallel, one result per input.
pub fn decode_all(buffers: &[Vec<u8>]) -> Vec<Result<Network>> {
    buffers
        .par_iter()
        .map(|buffer| decode_bytes(buffer))
        .collect()
}
