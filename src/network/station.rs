//! Survey stations

use bitflags::bitflags;

use super::names;
use crate::types::Vector3;

bitflags! {
    /// Station tags, bit-compatible with the LABEL record flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StationFlags: u8 {
        /// Station is on the surface.
        const SURFACE = 0x01;
        /// Station is underground.
        const UNDERGROUND = 0x02;
        /// Station is an entrance.
        const ENTRANCE = 0x04;
        /// Station is exported from its survey.
        const EXPORTED = 0x08;
        /// Station has fixed coordinates.
        const FIXED = 0x10;
        /// Station has no name of its own (splay ends).
        const ANONYMOUS = 0x20;
        /// Station lies on a passage wall.
        const WALL = 0x40;
    }
}

/// Passage-wall distances at a station, in metres. A side the surveyor
/// did not measure is `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lrud {
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub up: Option<f64>,
    pub down: Option<f64>,
}

/// Raw value 3D files write for an omitted dimension.
const OMITTED: i32 = -1;

impl Lrud {
    /// All four sides measured.
    pub fn new(left: f64, right: f64, up: f64, down: f64) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
            up: Some(up),
            down: Some(down),
        }
    }

    /// Convert the raw centimetre values of a cross-section record.
    pub fn from_centimetres(raw: [i32; 4]) -> Self {
        let side = |value: i32| (value != OMITTED).then(|| f64::from(value) / 100.0);
        Self {
            left: side(raw[0]),
            right: side(raw[1]),
            up: side(raw[2]),
            down: side(raw[3]),
        }
    }

    /// True when no side was measured.
    pub fn is_empty(&self) -> bool {
        [self.left, self.right, self.up, self.down].iter().all(Option::is_none)
    }
}

/// A named survey station
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Fully qualified dotted name, e.g. `cave.upper.12`
    pub name: String,
    /// Position in metres
    pub position: Vector3,
    pub flags: StationFlags,
    pub lrud: Option<Lrud>,
}

impl Station {
    pub fn new(name: impl Into<String>, position: Vector3) -> Self {
        Station {
            name: name.into(),
            position,
            flags: StationFlags::empty(),
            lrud: None,
        }
    }

    pub fn with_flags(mut self, flags: StationFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Dotted survey path the station belongs to (empty at top level)
    pub fn survey(&self) -> &str {
        names::survey_of(&self.name)
    }

    /// Last name component
    pub fn short_name(&self) -> &str {
        names::leaf_of(&self.name)
    }

    /// Name in Therion notation, `a.b.c` becomes `c@b.a`
    pub fn therion_name(&self) -> String {
        names::therion_name(&self.name)
    }

    pub fn is_surface(&self) -> bool {
        self.flags.contains(StationFlags::SURFACE)
    }

    pub fn is_underground(&self) -> bool {
        self.flags.contains(StationFlags::UNDERGROUND)
    }

    pub fn is_entrance(&self) -> bool {
        self.flags.contains(StationFlags::ENTRANCE)
    }

    pub fn is_exported(&self) -> bool {
        self.flags.contains(StationFlags::EXPORTED)
    }

    pub fn is_fixed(&self) -> bool {
        self.flags.contains(StationFlags::FIXED)
    }

    /// Euclidean distance to another station
    pub fn distance(&self, other: &Station) -> f64 {
        self.position.distance(&other.position)
    }

    /// Horizontal distance to another station
    pub fn distance_horizontal(&self, other: &Station) -> f64 {
        (other.position - self.position).horizontal_length()
    }

    /// Signed altitude difference, negative if `other` is below
    pub fn distance_vertical(&self, other: &Station) -> f64 {
        other.position.z - self.position.z
    }

    /// Compass bearing to another station in degrees
    pub fn bearing(&self, other: &Station) -> f64 {
        self.position.bearing_to(&other.position)
    }
}
