//! Textual file preamble: signature, version, title and timestamp lines.

use nom::bytes::complete::{tag, take_until};
use nom::character::complete::digit1;
use nom::combinator::{all_consuming, map_res};
use nom::sequence::{preceded, terminated};
use nom::IResult;

use super::constants::{file_flags, EXTENDED_TITLE_SUFFIX, SIGNATURE};
use super::FormatVersion;
use crate::error::{FormatError, Result};

/// Everything in front of the binary item stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble {
    pub version: FormatVersion,
    pub title: String,
    /// Coordinate system, stored after a NUL in version 8 titles
    pub coordinate_system: Option<String>,
    pub timestamp: String,
    /// Version 8 file flags, zero for older versions
    pub file_flags: u8,
    /// Offset of the first item byte
    pub data_offset: usize,
}

impl Preamble {
    /// Whether the file already holds an extended elevation.
    pub fn is_extended_elevation(&self) -> bool {
        self.file_flags & file_flags::EXTENDED != 0 || self.title.ends_with(EXTENDED_TITLE_SUFFIX)
    }
}

fn line(input: &[u8]) -> IResult<&[u8], &[u8]> {
    terminated(take_until("\n"), tag("\n"))(input)
}

fn version_number(input: &[u8]) -> IResult<&[u8], u32> {
    all_consuming(preceded(
        tag("v"),
        map_res(digit1, |d: &[u8]| {
            std::str::from_utf8(d)
                .map_err(|_| ())
                .and_then(|s| s.parse::<u32>().map_err(|_| ()))
        }),
    ))(input)
}

fn truncated(data: &[u8]) -> FormatError {
    FormatError::TruncatedData {
        offset: data.len(),
        needed: 1,
        available: 0,
    }
}

/// Parse the preamble at the start of `data`.
///
/// A wrong signature or version is [`FormatError::UnsupportedFormat`]; input
/// that ends before the preamble is complete is [`FormatError::TruncatedData`].
pub fn parse_preamble(data: &[u8]) -> Result<Preamble> {
    let rest = match tag::<_, _, nom::error::Error<&[u8]>>(SIGNATURE)(data) {
        Ok((rest, _)) => rest,
        Err(_) if data.len() < SIGNATURE.len() && SIGNATURE.starts_with(data) => {
            return Err(truncated(data))
        }
        Err(_) => {
            return Err(FormatError::UnsupportedFormat(
                "missing 'Survex 3D Image File' signature".into(),
            ))
        }
    };

    let (rest, version_line) = line(rest).map_err(|_| truncated(data))?;
    let (_, number) = version_number(version_line).map_err(|_| {
        FormatError::UnsupportedFormat(format!(
            "version line '{}'",
            String::from_utf8_lossy(version_line)
        ))
    })?;
    let version = FormatVersion::from_number(number)
        .ok_or_else(|| FormatError::UnsupportedFormat(format!("version {}", number)))?;

    let (rest, title_line) = line(rest).map_err(|_| truncated(data))?;
    let (rest, timestamp_line) = line(rest).map_err(|_| truncated(data))?;

    let encoding = version.text_encoding();
    let (title, coordinate_system) = match title_line.iter().position(|&b| b == 0) {
        Some(nul) => (
            encoding.decode(&title_line[..nul]).0.into_owned(),
            Some(encoding.decode(&title_line[nul + 1..]).0.into_owned()),
        ),
        None => (encoding.decode(title_line).0.into_owned(), None),
    };
    let timestamp = encoding.decode(timestamp_line).0.into_owned();

    let (file_flags, rest) = if version.has_file_flags() {
        match rest.split_first() {
            Some((&flags, rest)) => (flags, rest),
            None => return Err(truncated(data)),
        }
    } else {
        (0, rest)
    };

    Ok(Preamble {
        version,
        title,
        coordinate_system,
        timestamp,
        file_flags,
        data_offset: data.len() - rest.len(),
    })
}
