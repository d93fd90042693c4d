//! Decoded survey network: stations, legs, cross-sections and survey tree
//!
//! A [`Network`] is produced once by the decoder (or by [`NetworkBuilder`] for
//! networks assembled in memory) and is immutable afterwards. Every leg is
//! guaranteed to reference two stations of the same network.

pub mod date;
pub mod leg;
pub mod names;
pub mod path;
pub mod station;
pub mod survey_tree;

pub use date::{DateRange, SurveyDate};
pub use leg::{Leg, LegFlags};
pub use station::{Lrud, Station, StationFlags};
pub use survey_tree::{SurveyId, SurveyNode, SurveyTree};

use indexmap::IndexMap;

use crate::error::{FormatError, Result};
use crate::io::survex::FormatVersion;
use crate::notification::NotificationCollection;
use crate::types::BoundingBox3D;

/// LRUD measurement taken at a station
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSection {
    pub station: String,
    pub lrud: Lrud,
}

/// A run of cross-sections along one passage
pub type Passage = Vec<CrossSection>;

/// The decoded survey network
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    /// Dialect the network was decoded from, `None` for in-memory networks
    pub version: Option<FormatVersion>,
    pub title: String,
    pub timestamp: String,
    /// The file already holds an extended elevation
    pub is_extended_elevation: bool,
    stations: IndexMap<String, Station>,
    legs: Vec<Leg>,
    passages: Vec<Passage>,
    tree: SurveyTree,
    notifications: NotificationCollection,
}

impl Network {
    pub fn builder() -> NetworkBuilder {
        NetworkBuilder::new()
    }

    /// Stations in decode order
    pub fn stations(&self) -> impl ExactSizeIterator<Item = &Station> {
        self.stations.values()
    }

    pub fn station(&self, name: &str) -> Option<&Station> {
        self.stations.get(name)
    }

    /// Decode-order index of a station
    pub fn station_index(&self, name: &str) -> Option<usize> {
        self.stations.get_index_of(name)
    }

    pub fn station_at(&self, index: usize) -> Option<&Station> {
        self.stations.get_index(index).map(|(_, s)| s)
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Legs in decode order
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    pub fn survey_tree(&self) -> &SurveyTree {
        &self.tree
    }

    /// Non-fatal diagnostics collected while decoding
    pub fn notifications(&self) -> &NotificationCollection {
        &self.notifications
    }

    /// Both station indices of a leg. Always resolvable by construction.
    pub fn leg_ends(&self, leg: &Leg) -> (usize, usize) {
        let from = self.stations.get_index_of(&leg.from).unwrap_or_default();
        let to = self.stations.get_index_of(&leg.to).unwrap_or_default();
        (from, to)
    }

    /// Bounding box of all stations
    pub fn extent(&self) -> Option<BoundingBox3D> {
        BoundingBox3D::from_points(self.stations.values().map(|s| s.position))
    }

    /// Vertical range of all stations
    pub fn depth(&self) -> f64 {
        self.extent().map(|b| b.depth()).unwrap_or(0.0)
    }

    /// Total length of all legs whose flags do not intersect `exclude`
    pub fn length(&self, exclude: LegFlags) -> f64 {
        self.legs
            .iter()
            .filter(|leg| !leg.flags.intersects(exclude))
            .map(|leg| {
                let (a, b) = self.leg_ends(leg);
                self.stations[a].distance(&self.stations[b])
            })
            .sum()
    }

    /// Stations whose name starts with `prefix`, in decode order
    pub fn stations_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a Station> + 'a {
        self.stations
            .values()
            .filter(move |s| s.name.starts_with(prefix))
    }

    /// Station names in natural order
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.stations.keys().map(String::as_str).collect();
        names.sort_by(|a, b| names::natural_cmp(a, b));
        names
    }

    /// Shortest path along legs between two stations, see [`path::shortest_path`]
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<(f64, Vec<String>)> {
        path::shortest_path(self, from, to)
    }
}

/// Assembles a [`Network`] and checks its invariants.
///
/// The decoder feeds it record by record; tests and callers with in-memory
/// data use the same path.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    version: Option<FormatVersion>,
    title: String,
    timestamp: String,
    is_extended_elevation: bool,
    stations: IndexMap<String, Station>,
    legs: Vec<(Leg, usize)>,
    passages: Vec<Vec<(CrossSection, usize)>>,
    passage_open: bool,
    notifications: NotificationCollection,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: FormatVersion) -> Self {
        self.version = Some(version);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn extended_elevation(mut self, extended: bool) -> Self {
        self.is_extended_elevation = extended;
        self
    }

    pub(crate) fn set_notifications(&mut self, notifications: NotificationCollection) {
        self.notifications = notifications;
    }

    /// Add a station. See [`NetworkBuilder::add_station_at`].
    pub fn add_station(&mut self, station: Station) -> Result<()> {
        self.add_station_at(station, 0)
    }

    /// Add a station decoded at `offset`. Re-adding a name at the same
    /// position merges the flags; the same name at another position is a
    /// corrupt record.
    pub fn add_station_at(&mut self, station: Station, offset: usize) -> Result<()> {
        if !station.position.is_finite() {
            return Err(FormatError::corrupt(
                offset,
                format!("station '{}' has a non-finite coordinate", station.name),
            ));
        }
        match self.stations.get_mut(&station.name) {
            Some(existing) if existing.position == station.position => {
                existing.flags |= station.flags;
                Ok(())
            }
            Some(existing) => Err(FormatError::corrupt(
                offset,
                format!(
                    "station '{}' labelled at {} and at {}",
                    station.name, existing.position, station.position
                ),
            )),
            None => {
                self.stations.insert(station.name.clone(), station);
                Ok(())
            }
        }
    }

    pub fn add_leg(&mut self, leg: Leg) {
        self.add_leg_at(leg, 0);
    }

    pub fn add_leg_at(&mut self, leg: Leg, offset: usize) {
        self.legs.push((leg, offset));
    }

    /// Append a cross-section to the open passage, starting a new one if the
    /// previous passage was closed.
    pub fn add_cross_section_at(&mut self, section: CrossSection, ends_passage: bool, offset: usize) {
        if !self.passage_open {
            self.passages.push(Vec::new());
            self.passage_open = true;
        }
        if let Some(open) = self.passages.last_mut() {
            open.push((section, offset));
        }
        if ends_passage {
            self.passage_open = false;
        }
    }

    /// Validate references and build the survey tree.
    pub fn build(self) -> Result<Network> {
        let NetworkBuilder {
            version,
            title,
            timestamp,
            is_extended_elevation,
            mut stations,
            legs,
            passages,
            notifications,
            ..
        } = self;

        let mut resolved_legs = Vec::with_capacity(legs.len());
        for (mut leg, offset) in legs {
            for end in [&leg.from, &leg.to] {
                if !stations.contains_key(end) {
                    return Err(FormatError::DanglingReference {
                        offset,
                        detail: format!("leg {} -> {} names unknown station '{}'", leg.from, leg.to, end),
                    });
                }
            }
            if leg.survey.is_empty() {
                leg.survey = names::survey_of(&leg.from).to_string();
            }
            resolved_legs.push(leg);
        }

        let mut resolved_passages = Vec::new();
        for passage in passages {
            let mut sections = Vec::with_capacity(passage.len());
            for (section, offset) in passage {
                match stations.get_mut(&section.station) {
                    Some(station) => station.lrud = Some(section.lrud),
                    None => {
                        return Err(FormatError::corrupt(
                            offset,
                            format!("cross-section names unknown station '{}'", section.station),
                        ))
                    }
                }
                sections.push(section);
            }
            resolved_passages.push(sections);
        }

        let mut tree = SurveyTree::new();
        for (index, station) in stations.values().enumerate() {
            tree.attach_station(station.survey(), index);
        }
        for (index, leg) in resolved_legs.iter().enumerate() {
            tree.attach_leg(&leg.survey, index);
        }

        Ok(Network {
            version,
            title,
            timestamp,
            is_extended_elevation,
            stations,
            legs: resolved_legs,
            passages: resolved_passages,
            tree,
            notifications,
        })
    }
}
