//! Bounds-checked cursor over a 3D file.
//!
//! The reader validates the preamble on [`SurvexReader::open`] and then only
//! knows field shapes: little-endian integers, coordinate triples, the two
//! length-prefix encodings and label text. What the fields mean is the
//! decoder's business.

use std::io::Read;

use byteorder::{ByteOrder, LittleEndian};
use encoding_rs::Encoding;

use super::constants::{LEGACY_LEN_ESCAPE_16, LEGACY_LEN_ESCAPE_32, PACKED_LEN_ESCAPE};
use super::preamble::{parse_preamble, Preamble};
use super::FormatVersion;
use crate::error::{FormatError, Result};

/// Cursor over a fully buffered 3D file.
#[derive(Debug, Clone)]
pub struct SurvexReader {
    data: Vec<u8>,
    position: usize,
    preamble: Preamble,
    encoding: &'static Encoding,
}

impl SurvexReader {
    /// Validate the preamble and position the cursor on the first item.
    pub fn open(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let data: Vec<u8> = bytes.into();
        let preamble = parse_preamble(&data)?;
        Ok(Self {
            position: preamble.data_offset,
            encoding: preamble.version.text_encoding(),
            preamble,
            data,
        })
    }

    /// Drain a caller-supplied byte source and open it.
    pub fn from_stream<R: Read>(mut source: R) -> Result<Self> {
        let mut data = Vec::new();
        source.read_to_end(&mut data)?;
        Self::open(data)
    }

    pub fn version(&self) -> FormatVersion {
        self.preamble.version
    }

    pub fn preamble(&self) -> &Preamble {
        &self.preamble
    }

    /// Current byte offset from the start of the file.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    // ---------------------------------------------------------------
    // Internal helpers
    // ---------------------------------------------------------------

    fn take(&mut self, n: usize) -> Result<&[u8]> {
        let available = self.remaining();
        if n > available {
            return Err(FormatError::TruncatedData {
                offset: self.position,
                needed: n,
                available,
            });
        }
        let start = self.position;
        self.position += n;
        Ok(&self.data[start..start + n])
    }

    // ---------------------------------------------------------------
    // Fixed-width fields
    // ---------------------------------------------------------------

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    /// Consume `n` bytes without looking at them.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    // ---------------------------------------------------------------
    // Coordinates
    // ---------------------------------------------------------------

    /// Absolute coordinate: three `i32` centimetre values.
    pub fn read_xyz(&mut self) -> Result<[i32; 3]> {
        let bytes = self.take(12)?;
        Ok([
            LittleEndian::read_i32(&bytes[0..4]),
            LittleEndian::read_i32(&bytes[4..8]),
            LittleEndian::read_i32(&bytes[8..12]),
        ])
    }

    /// Compact coordinate: three `i16` centimetre deltas from `base`.
    pub fn read_diminishing_xyz(&mut self, base: [i32; 3]) -> Result<[i32; 3]> {
        let offset = self.position;
        let bytes = self.take(6)?;
        let deltas = [
            LittleEndian::read_i16(&bytes[0..2]),
            LittleEndian::read_i16(&bytes[2..4]),
            LittleEndian::read_i16(&bytes[4..6]),
        ];
        let mut xyz = [0i32; 3];
        for axis in 0..3 {
            xyz[axis] = base[axis]
                .checked_add(i32::from(deltas[axis]))
                .ok_or_else(|| FormatError::corrupt(offset, "delta coordinate overflows"))?;
        }
        Ok(xyz)
    }

    // ---------------------------------------------------------------
    // Variable-length fields
    // ---------------------------------------------------------------

    /// Legacy length prefix: one byte, `0xFE` adds a following `u16`,
    /// `0xFF` adds a following `u32`.
    pub fn read_legacy_len(&mut self) -> Result<usize> {
        let first = self.read_u8()?;
        let len = match first {
            LEGACY_LEN_ESCAPE_16 => usize::from(first) + usize::from(self.read_u16()?),
            LEGACY_LEN_ESCAPE_32 => usize::from(first) + self.read_u32()? as usize,
            _ => usize::from(first),
        };
        Ok(len)
    }

    /// Packed length: one byte, `0xFF` is replaced by a following `u32`.
    pub fn read_packed_len(&mut self) -> Result<usize> {
        match self.read_u8()? {
            PACKED_LEN_ESCAPE => Ok(self.read_u32()? as usize),
            n => Ok(usize::from(n)),
        }
    }

    /// Raw label bytes; decoded later with [`SurvexReader::decode_text`]
    /// once the label buffer is complete.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        self.take(n).map(<[u8]>::to_vec)
    }

    /// Read `n` bytes of text in the file's encoding.
    pub fn read_text(&mut self, n: usize) -> Result<String> {
        let encoding = self.encoding;
        let bytes = self.take(n)?;
        Ok(encoding.decode(bytes).0.into_owned())
    }

    /// Decode label bytes in the file's encoding.
    pub fn decode_text(&self, bytes: &[u8]) -> String {
        self.encoding.decode(bytes).0.into_owned()
    }
}
