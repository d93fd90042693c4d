//! Per-version opcode tables.
//!
//! Each format version maps the 256 possible item bytes to an [`Opcode`].
//! Versions 3, 4 to 6, and 7 share a fixed-grammar layout with shifting
//! ranges; version 8 uses tagged items. The tables are built once and
//! selected by [`Dialect::for_version`] at the start of a decode pass.

use once_cell::sync::Lazy;

use super::constants::{LABEL_FLAG_MASK, LEGACY_LABEL_FLAG_MASK, LINE_FLAG_MASK};
use super::FormatVersion;

/// Payload layout of a date record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateForm {
    /// Date unknown from here on
    None,
    /// One `u32` of seconds since 1970
    Seconds,
    /// Two `u32` of seconds since 1970
    SecondsPair,
    /// One `u16` of days since 1900
    Days,
    /// `u16` days since 1900 plus a `u8` span in days
    DaysSpan,
    /// Two `u16` of days since 1900
    DaysPair,
}

/// How label fields are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelEncoding {
    /// Legacy length prefix; bytes are appended to the label buffer.
    Append,
    /// Version 8 delete/add counts.
    DeleteAdd,
}

/// Meaning of one item byte in a given dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// Legacy: clear the label buffer, or end of data as the final byte.
    Stop,
    /// Legacy: drop trailing label components.
    TrimComponents(u8),
    /// Legacy: drop this many trailing label bytes.
    TrimBytes(u8),
    Move,
    Date(DateForm),
    ErrorInfo,
    CrossSection { wide: bool, ends_passage: bool },
    Label { flags: u8 },
    Line { flags: u8 },
    /// Legacy: LINE with an `i16` delta from the current point.
    DeltaLine { flags: u8 },
    /// Version 8 drawing style
    Style(u8),
    /// Version 8 code with no assigned meaning
    Reserved,
    /// Byte not valid in this dialect
    Invalid,
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

type Table = [Opcode; 256];

fn legacy_base() -> Table {
    let mut table = [Opcode::Invalid; 256];
    table[0x00] = Opcode::Stop;
    for byte in 0x01..=0x0Eu8 {
        table[byte as usize] = Opcode::TrimComponents(byte);
    }
    table[0x0F] = Opcode::Move;
    for byte in 0x10..=0x1Fu8 {
        table[byte as usize] = Opcode::TrimBytes(byte - 0x0F);
    }
    for byte in 0x40..=0x7Fu8 {
        table[byte as usize] = Opcode::Label {
            flags: byte & LEGACY_LABEL_FLAG_MASK,
        };
    }
    for byte in 0x80..=0xBFu8 {
        table[byte as usize] = Opcode::Line {
            flags: byte & LINE_FLAG_MASK,
        };
    }
    table
}

fn with_legacy_extensions(mut table: Table) -> Table {
    table[0x22] = Opcode::ErrorInfo;
    for byte in 0x30..=0x33u8 {
        table[byte as usize] = Opcode::CrossSection {
            wide: byte & 0x02 != 0,
            ends_passage: byte & 0x01 != 0,
        };
    }
    for byte in 0xC0..=0xFFu8 {
        table[byte as usize] = Opcode::DeltaLine {
            flags: byte & LINE_FLAG_MASK,
        };
    }
    table
}

static LEGACY_V3: Lazy<Table> = Lazy::new(legacy_base);

static LEGACY_V4: Lazy<Table> = Lazy::new(|| {
    let mut table = with_legacy_extensions(legacy_base());
    table[0x20] = Opcode::Date(DateForm::Seconds);
    table[0x21] = Opcode::Date(DateForm::SecondsPair);
    table
});

static LEGACY_V7: Lazy<Table> = Lazy::new(|| {
    let mut table = with_legacy_extensions(legacy_base());
    table[0x20] = Opcode::Date(DateForm::Days);
    table[0x21] = Opcode::Date(DateForm::DaysSpan);
    table[0x23] = Opcode::Date(DateForm::DaysPair);
    table[0x24] = Opcode::Date(DateForm::None);
    table
});

static TAGGED_V8: Lazy<Table> = Lazy::new(|| {
    let mut table = [Opcode::Reserved; 256];
    for byte in 0x00..=0x05u8 {
        table[byte as usize] = Opcode::Style(byte);
    }
    table[0x0F] = Opcode::Move;
    table[0x10] = Opcode::Date(DateForm::None);
    table[0x11] = Opcode::Date(DateForm::Days);
    table[0x12] = Opcode::Date(DateForm::DaysSpan);
    table[0x13] = Opcode::Date(DateForm::DaysPair);
    table[0x1F] = Opcode::ErrorInfo;
    for byte in 0x30..=0x33u8 {
        table[byte as usize] = Opcode::CrossSection {
            wide: byte & 0x02 != 0,
            ends_passage: byte & 0x01 != 0,
        };
    }
    for byte in 0x40..=0x7Fu8 {
        table[byte as usize] = Opcode::Line {
            flags: byte & LINE_FLAG_MASK,
        };
    }
    for byte in 0x80..=0xFFu8 {
        table[byte as usize] = Opcode::Label {
            flags: byte & LABEL_FLAG_MASK,
        };
    }
    table
});

// ---------------------------------------------------------------------------
// Dialect
// ---------------------------------------------------------------------------

/// Opcode table and encoding rules for one format version.
#[derive(Debug, Clone, Copy)]
pub struct Dialect {
    version: FormatVersion,
    table: &'static Table,
}

impl Dialect {
    pub fn for_version(version: FormatVersion) -> Self {
        let table: &'static Table = match version {
            FormatVersion::V3 => &*LEGACY_V3,
            FormatVersion::V4 | FormatVersion::V5 | FormatVersion::V6 => &*LEGACY_V4,
            FormatVersion::V7 => &*LEGACY_V7,
            FormatVersion::V8 => &*TAGGED_V8,
        };
        Self { version, table }
    }

    pub fn version(&self) -> FormatVersion {
        self.version
    }

    pub fn opcode(&self, byte: u8) -> Opcode {
        self.table[byte as usize]
    }

    /// Version 8 tagged items, as opposed to the legacy record stream.
    pub fn is_tagged(&self) -> bool {
        self.version == FormatVersion::V8
    }

    pub fn label_encoding(&self) -> LabelEncoding {
        if self.is_tagged() {
            LabelEncoding::DeleteAdd
        } else {
            LabelEncoding::Append
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_ranges() {
        let d = Dialect::for_version(FormatVersion::V5);
        assert_eq!(d.opcode(0x00), Opcode::Stop);
        assert_eq!(d.opcode(0x03), Opcode::TrimComponents(3));
        assert_eq!(d.opcode(0x0F), Opcode::Move);
        assert_eq!(d.opcode(0x12), Opcode::TrimBytes(3));
        assert_eq!(d.opcode(0x20), Opcode::Date(DateForm::Seconds));
        assert_eq!(d.opcode(0x47), Opcode::Label { flags: 0x07 });
        assert_eq!(d.opcode(0x82), Opcode::Line { flags: 0x02 });
        assert_eq!(d.opcode(0xC0), Opcode::DeltaLine { flags: 0 });
        assert_eq!(
            d.opcode(0x33),
            Opcode::CrossSection { wide: true, ends_passage: true }
        );
        assert_eq!(d.opcode(0x25), Opcode::Invalid);
        assert!(!d.is_tagged());
        assert_eq!(d.label_encoding(), LabelEncoding::Append);
    }

    #[test]
    fn test_version_3_has_no_extensions() {
        let d = Dialect::for_version(FormatVersion::V3);
        assert_eq!(d.opcode(0x20), Opcode::Invalid);
        assert_eq!(d.opcode(0x30), Opcode::Invalid);
        assert_eq!(d.opcode(0xC0), Opcode::Invalid);
        assert_eq!(d.opcode(0x40), Opcode::Label { flags: 0 });
    }

    #[test]
    fn test_version_7_dates() {
        let d = Dialect::for_version(FormatVersion::V7);
        assert_eq!(d.opcode(0x20), Opcode::Date(DateForm::Days));
        assert_eq!(d.opcode(0x21), Opcode::Date(DateForm::DaysSpan));
        assert_eq!(d.opcode(0x22), Opcode::ErrorInfo);
        assert_eq!(d.opcode(0x23), Opcode::Date(DateForm::DaysPair));
        assert_eq!(d.opcode(0x24), Opcode::Date(DateForm::None));
    }

    #[test]
    fn test_tagged_v8() {
        let d = Dialect::for_version(FormatVersion::V8);
        assert!(d.is_tagged());
        assert_eq!(d.opcode(0x00), Opcode::Style(0));
        assert_eq!(d.opcode(0x06), Opcode::Reserved);
        assert_eq!(d.opcode(0x60), Opcode::Line { flags: 0x20 });
        assert_eq!(d.opcode(0xC4), Opcode::Label { flags: 0x44 });
        assert_eq!(d.label_encoding(), LabelEncoding::DeleteAdd);
    }
}
