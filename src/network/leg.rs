//! Survey legs

use bitflags::bitflags;

use super::date::DateRange;

bitflags! {
    /// Leg flags, bit-compatible with the LINE record flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LegFlags: u8 {
        /// Leg is on the surface.
        const SURFACE = 0x01;
        /// Leg duplicates another one.
        const DUPLICATE = 0x02;
        /// Leg is a splay shot.
        const SPLAY = 0x04;
    }
}

/// One centerline measurement between two named stations
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    /// Name of the station the leg starts at
    pub from: String,
    /// Name of the station the leg ends at
    pub to: String,
    pub flags: LegFlags,
    /// Survey the leg was recorded in (dotted path)
    pub survey: String,
    pub date: Option<DateRange>,
}

impl Leg {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Leg {
            from: from.into(),
            to: to.into(),
            flags: LegFlags::empty(),
            survey: String::new(),
            date: None,
        }
    }

    pub fn with_flags(mut self, flags: LegFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_survey(mut self, survey: impl Into<String>) -> Self {
        self.survey = survey.into();
        self
    }

    pub fn is_surface(&self) -> bool {
        self.flags.contains(LegFlags::SURFACE)
    }

    pub fn is_duplicate(&self) -> bool {
        self.flags.contains(LegFlags::DUPLICATE)
    }

    pub fn is_splay(&self) -> bool {
        self.flags.contains(LegFlags::SPLAY)
    }

    /// Names of both ends, in leg order
    pub fn ends(&self) -> (&str, &str) {
        (&self.from, &self.to)
    }
}
