//! Magic strings, flag masks and limits of the Survex 3D format.

/// First line of every 3D file, including the terminating newline.
pub const SIGNATURE: &[u8] = b"Survex 3D Image File\n";

/// Lowest and highest version-line numbers this crate decodes.
pub const MIN_VERSION: u32 = 3;
pub const MAX_VERSION: u32 = 8;

/// Title suffix written by the `extend` tool.
pub const EXTENDED_TITLE_SUFFIX: &str = " (extended)";

/// Version 8 file-wide flags (byte following the timestamp line).
pub mod file_flags {
    /// File holds an extended elevation.
    pub const EXTENDED: u8 = 0x80;
}

/// Bits of a LINE opcode that carry leg flags.
pub const LINE_FLAG_MASK: u8 = 0x3F;
/// Version 8 LINE bit meaning "label unchanged, no label field follows".
pub const LINE_NO_LABEL: u8 = 0x20;
/// Bits of a legacy LABEL opcode that carry station flags.
pub const LEGACY_LABEL_FLAG_MASK: u8 = 0x3F;
/// Bits of a version 8 LABEL item that carry station flags.
pub const LABEL_FLAG_MASK: u8 = 0x7F;

/// Legacy TRIM-components records always drop at least this many trailing
/// bytes before searching for separators.
pub const TRIM_COMPONENT_BASE: usize = 17;

/// Legacy length escapes: `0xFE` adds a `u16`, `0xFF` adds a `u32`.
pub const LEGACY_LEN_ESCAPE_16: u8 = 0xFE;
pub const LEGACY_LEN_ESCAPE_32: u8 = 0xFF;
/// Version 8 length escape: `0xFF` is replaced by a `u32`.
pub const PACKED_LEN_ESCAPE: u8 = 0xFF;

/// Payload of an error-info record: five 32-bit values.
pub const ERROR_INFO_LEN: usize = 5 * 4;

/// Version 8 style code that, repeated, marks the end of data.
pub const STYLE_NORMAL: u8 = 0x00;
