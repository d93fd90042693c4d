//! Network decoder: item stream to [`Network`].
//!
//! The decoder walks the item stream once, driving the label buffer and the
//! pen from each record, and collects raw legs as coordinate pairs. Legs
//! are tied to station names in a post-pass, once every LABEL is known.

use ahash::AHashMap;

use super::constants::{ERROR_INFO_LEN, LINE_NO_LABEL, STYLE_NORMAL};
use super::dialect::{DateForm, Dialect, LabelEncoding, Opcode};
use super::pen::{Pen, PenEvent, RawPoint, Transition};
use super::prefix::SurveyPrefix;
use super::reader::SurvexReader;
use crate::error::{FormatError, Result};
use crate::network::names::{self, SEPARATOR};
use crate::network::{
    CrossSection, DateRange, Leg, LegFlags, Lrud, Network, NetworkBuilder, Station, StationFlags,
    SurveyDate,
};
use crate::notification::{NotificationCollection, NotificationType};
use crate::types::Vector3;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration options for the network decoder.
#[derive(Debug, Clone)]
pub struct DecoderConfiguration {
    /// When `true`, version 8 items with a reserved code are skipped and
    /// reported as notifications. When `false` they fail the decode with
    /// [`FormatError::CorruptRecord`].
    ///
    /// Default: `true`.
    pub skip_unknown_items: bool,
}

impl Default for DecoderConfiguration {
    fn default() -> Self {
        Self {
            skip_unknown_items: true,
        }
    }
}

impl DecoderConfiguration {
    pub fn with_skip_unknown_items(mut self, skip: bool) -> Self {
        self.skip_unknown_items = skip;
        self
    }
}

// ---------------------------------------------------------------------------
// NetworkDecoder
// ---------------------------------------------------------------------------

/// A LINE before its ends are tied to station names.
#[derive(Debug)]
struct RawLeg {
    from: RawPoint,
    to: RawPoint,
    flags: LegFlags,
    survey: String,
    date: Option<DateRange>,
    offset: usize,
}

/// Decodes one 3D file into a [`Network`].
pub struct NetworkDecoder {
    reader: SurvexReader,
    dialect: Dialect,
    config: DecoderConfiguration,
    notifications: NotificationCollection,
    builder: NetworkBuilder,
    label: SurveyPrefix,
    pen: Pen,
    date: Option<DateRange>,
    /// Current version 8 style, unset until the first STYLE item
    style: Option<u8>,
    /// Stations labelled at each position, in label order
    by_position: AHashMap<RawPoint, Vec<String>>,
    legs: Vec<RawLeg>,
    anonymous: usize,
}

impl NetworkDecoder {
    pub fn new(reader: SurvexReader) -> Self {
        let preamble = reader.preamble();
        let builder = Network::builder()
            .version(preamble.version)
            .title(preamble.title.clone())
            .timestamp(preamble.timestamp.clone())
            .extended_elevation(preamble.is_extended_elevation());
        Self {
            dialect: Dialect::for_version(reader.version()),
            reader,
            config: DecoderConfiguration::default(),
            notifications: NotificationCollection::new(),
            builder,
            label: SurveyPrefix::new(),
            pen: Pen::new(),
            date: None,
            style: None,
            by_position: AHashMap::new(),
            legs: Vec::new(),
            anonymous: 0,
        }
    }

    /// Set configuration options.
    pub fn with_configuration(mut self, config: DecoderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Read the whole item stream and build the network.
    pub fn decode(mut self) -> Result<Network> {
        if self.dialect.is_tagged() {
            self.read_tagged_items()?;
        } else {
            self.read_legacy_records()?;
        }
        self.finish()
    }

    // -----------------------------------------------------------------------
    // Item streams
    // -----------------------------------------------------------------------

    fn read_legacy_records(&mut self) -> Result<()> {
        loop {
            let offset = self.reader.position();
            let byte = self.reader.read_u8()?;
            match self.dialect.opcode(byte) {
                Opcode::Stop => {
                    if self.reader.is_at_end() {
                        return Ok(());
                    }
                    self.label.reset();
                }
                Opcode::TrimComponents(count) => {
                    if !self.label.pop_components(usize::from(count)) {
                        return Err(FormatError::corrupt(
                            offset,
                            format!(
                                "cannot trim {} component(s) from a {}-byte label",
                                count,
                                self.label.len()
                            ),
                        ));
                    }
                }
                Opcode::TrimBytes(count) => {
                    if !self.label.pop_bytes(usize::from(count)) {
                        return Err(FormatError::corrupt(
                            offset,
                            format!("cannot trim {} byte(s) from a {}-byte label", count, self.label.len()),
                        ));
                    }
                }
                Opcode::Invalid | Opcode::Reserved | Opcode::Style(_) => {
                    return Err(FormatError::corrupt(
                        offset,
                        format!("opcode {:#04X} is not valid in {}", byte, self.dialect.version()),
                    ));
                }
                opcode => self.read_record(opcode, offset)?,
            }
        }
    }

    fn read_tagged_items(&mut self) -> Result<()> {
        loop {
            let offset = self.reader.position();
            let code = self.reader.read_u8()?;
            match self.dialect.opcode(code) {
                Opcode::Style(style) => {
                    if style == STYLE_NORMAL && self.style == Some(STYLE_NORMAL) {
                        let trailing = self.reader.remaining();
                        if trailing > 0 {
                            self.notifications.notify_at(
                                NotificationType::Warning,
                                self.reader.position(),
                                format!("{} byte(s) after the end of data ignored", trailing),
                            );
                        }
                        return Ok(());
                    }
                    self.style = Some(style);
                }
                Opcode::Reserved => {
                    let message = format!("reserved item code {:#04X}", code);
                    if !self.config.skip_unknown_items {
                        return Err(FormatError::corrupt(offset, message));
                    }
                    self.notifications
                        .notify_at(NotificationType::Skipped, offset, message);
                }
                Opcode::Stop
                | Opcode::TrimComponents(_)
                | Opcode::TrimBytes(_)
                | Opcode::DeltaLine { .. }
                | Opcode::Invalid => {
                    return Err(FormatError::corrupt(
                        offset,
                        format!("item code {:#04X} is not valid in {}", code, self.dialect.version()),
                    ));
                }
                opcode => self.read_record(opcode, offset)?,
            }
        }
    }

    /// Records whose meaning is shared by all dialects.
    fn read_record(&mut self, opcode: Opcode, offset: usize) -> Result<()> {
        match opcode {
            Opcode::Move => {
                let at = self.reader.read_xyz()?;
                self.pen.apply(PenEvent::MoveTo(at));
            }
            Opcode::Line { flags } => {
                // version 8 LINE items may keep the label unchanged
                if !(self.dialect.is_tagged() && flags & LINE_NO_LABEL != 0) {
                    self.read_label_field(offset)?;
                }
                let to = self.reader.read_xyz()?;
                self.draw_to(to, flags, offset)?;
            }
            Opcode::DeltaLine { flags } => {
                self.read_label_field(offset)?;
                let base = self.pen.current().ok_or_else(|| {
                    FormatError::corrupt(offset, "DELTA-LINE without current point")
                })?;
                let to = self.reader.read_diminishing_xyz(base)?;
                self.draw_to(to, flags, offset)?;
            }
            Opcode::Label { flags } => {
                self.read_label_field(offset)?;
                let at = self.reader.read_xyz()?;
                self.add_station(at, StationFlags::from_bits_truncate(flags), offset)?;
            }
            Opcode::CrossSection { wide, ends_passage } => {
                self.read_label_field(offset)?;
                let mut raw = [0i32; 4];
                for value in raw.iter_mut() {
                    *value = if wide {
                        self.reader.read_i32()?
                    } else {
                        i32::from(self.reader.read_i16()?)
                    };
                }
                let section = CrossSection {
                    station: self.current_label(),
                    lrud: Lrud::from_centimetres(raw),
                };
                self.builder
                    .add_cross_section_at(section, ends_passage, offset);
            }
            Opcode::Date(form) => self.date = self.read_date(form)?,
            Opcode::ErrorInfo => self.reader.skip(ERROR_INFO_LEN)?,
            Opcode::Stop
            | Opcode::TrimComponents(_)
            | Opcode::TrimBytes(_)
            | Opcode::Style(_)
            | Opcode::Reserved
            | Opcode::Invalid => {
                return Err(FormatError::corrupt(offset, format!("unexpected {:?} record", opcode)));
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Fields
    // -----------------------------------------------------------------------

    fn read_label_field(&mut self, offset: usize) -> Result<()> {
        match self.dialect.label_encoding() {
            LabelEncoding::Append => {
                let len = self.reader.read_legacy_len()?;
                let bytes = self.reader.read_bytes(len)?;
                self.label.push(&bytes);
            }
            LabelEncoding::DeleteAdd => {
                let packed = self.reader.read_u8()?;
                let (delete, add) = if packed != 0 {
                    (usize::from(packed >> 4), usize::from(packed & 0x0F))
                } else {
                    (self.reader.read_packed_len()?, self.reader.read_packed_len()?)
                };
                if !self.label.pop_bytes(delete) {
                    return Err(FormatError::corrupt(
                        offset,
                        format!("label field deletes {} of {} byte(s)", delete, self.label.len()),
                    ));
                }
                let bytes = self.reader.read_bytes(add)?;
                self.label.push(&bytes);
            }
        }
        Ok(())
    }

    fn read_date(&mut self, form: DateForm) -> Result<Option<DateRange>> {
        let offset = self.reader.position();
        let seconds = |value: u32| {
            SurveyDate::from_unix_seconds(value)
                .ok_or_else(|| FormatError::corrupt(offset, format!("timestamp {} out of range", value)))
        };
        let days = |value: u32| {
            SurveyDate::from_days_since_1900(value)
                .ok_or_else(|| FormatError::corrupt(offset, format!("day {} out of range", value)))
        };
        let range = match form {
            DateForm::None => return Ok(None),
            DateForm::Seconds => DateRange::single(seconds(self.reader.read_u32()?)?),
            DateForm::SecondsPair => {
                let first = seconds(self.reader.read_u32()?)?;
                let last = seconds(self.reader.read_u32()?)?;
                DateRange::new(first, last)
            }
            DateForm::Days => DateRange::single(days(u32::from(self.reader.read_u16()?))?),
            DateForm::DaysSpan => {
                let first = u32::from(self.reader.read_u16()?);
                let span = u32::from(self.reader.read_u8()?);
                DateRange::new(days(first)?, days(first + span)?)
            }
            DateForm::DaysPair => {
                let first = days(u32::from(self.reader.read_u16()?))?;
                let last = days(u32::from(self.reader.read_u16()?))?;
                DateRange::new(first, last)
            }
        };
        Ok(Some(range))
    }

    fn current_label(&self) -> String {
        self.reader.decode_text(self.label.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    fn draw_to(&mut self, to: RawPoint, flags: u8, offset: usize) -> Result<()> {
        match self.pen.apply(PenEvent::LineTo(to)) {
            Transition::Stroke { from, to } => {
                let survey = self
                    .current_label()
                    .trim_end_matches(SEPARATOR)
                    .to_string();
                self.legs.push(RawLeg {
                    from,
                    to,
                    flags: LegFlags::from_bits_truncate(flags & !LINE_NO_LABEL),
                    survey,
                    date: self.date,
                    offset,
                });
                Ok(())
            }
            Transition::NoCurrentPoint => Err(FormatError::corrupt(offset, "LINE without current point")),
            Transition::Moved => Ok(()),
        }
    }

    fn add_station(&mut self, at: RawPoint, mut flags: StationFlags, offset: usize) -> Result<()> {
        let label = self.current_label();
        let name = if flags.contains(StationFlags::ANONYMOUS) || label.is_empty() {
            flags |= StationFlags::ANONYMOUS;
            self.anonymous += 1;
            let survey = label.trim_end_matches(SEPARATOR);
            if survey.is_empty() {
                format!("~{}", self.anonymous)
            } else {
                format!("{}{}~{}", survey, SEPARATOR, self.anonymous)
            }
        } else {
            label
        };
        let labelled = self.by_position.entry(at).or_default();
        if !labelled.contains(&name) {
            labelled.push(name.clone());
        }
        self.builder.add_station_at(
            Station::new(name, Vector3::from_centimetres(at)).with_flags(flags),
            offset,
        )
    }

    // -----------------------------------------------------------------------
    // Post-pass
    // -----------------------------------------------------------------------

    /// Station name for a leg end. Equated stations share a position; the
    /// one in the leg's own survey wins, then one below it, then the first
    /// labelled.
    fn resolve(&self, at: RawPoint, survey: &str, offset: usize) -> Result<String> {
        let labelled = self
            .by_position
            .get(&at)
            .filter(|names| !names.is_empty())
            .ok_or_else(|| FormatError::DanglingReference {
                offset,
                detail: format!("no station labelled at {}", Vector3::from_centimetres(at)),
            })?;
        let below = |name: &&String| {
            !survey.is_empty()
                && name.len() > survey.len()
                && name.starts_with(survey)
                && name[survey.len()..].starts_with(SEPARATOR)
        };
        let chosen = labelled
            .iter()
            .find(|name| names::survey_of(name) == survey)
            .or_else(|| labelled.iter().find(below))
            .unwrap_or(&labelled[0]);
        Ok(chosen.clone())
    }

    fn finish(mut self) -> Result<Network> {
        for raw in std::mem::take(&mut self.legs) {
            let from = self.resolve(raw.from, &raw.survey, raw.offset)?;
            let to = self.resolve(raw.to, &raw.survey, raw.offset)?;
            let mut leg = Leg::new(from, to)
                .with_flags(raw.flags)
                .with_survey(raw.survey);
            leg.date = raw.date;
            self.builder.add_leg_at(leg, raw.offset);
        }
        self.builder.set_notifications(self.notifications);
        self.builder.build()
    }
}
