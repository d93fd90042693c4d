//! Drawing assembler.
//!
//! Turns a projected [`Network`] into an ordered list of [`DrawPrimitive`]s:
//! leg polylines, station markers, labels and a scale bar. The order is
//! fixed by the survey tree (pre-order) and decode order inside each
//! survey, so identical input always gives an identical list.

pub mod filter;
pub mod options;
pub mod scale_bar;

pub use filter::NameFilter;
pub use options::{DrawingOptions, LabelPolicy, MarkerScheme, SurveyHandling};
pub use scale_bar::{ScaleBar, ScaleUnit};

use crate::error::{FormatError, Result};
use crate::network::{names, Leg, LegFlags, Network, StationFlags, SurveyTree};
use crate::projection::Projection;
use crate::types::{BoundingBox2D, Vector2};

/// Space between the drawing and the scale bar, in document units.
pub const SCALE_BAR_MARGIN: f64 = 10.0;

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// Rendering class of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegStyle {
    Underground,
    Surface,
    Duplicate,
    Splay,
}

impl LegStyle {
    pub fn from_flags(flags: LegFlags) -> Self {
        if flags.contains(LegFlags::SPLAY) {
            Self::Splay
        } else if flags.contains(LegFlags::DUPLICATE) {
            Self::Duplicate
        } else if flags.contains(LegFlags::SURFACE) {
            Self::Surface
        } else {
            Self::Underground
        }
    }
}

/// A connected run of legs.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    /// Survey group (dotted path, empty for the root)
    pub group: String,
    pub points: Vec<Vector2>,
    pub style: LegStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerShape {
    Circle,
    Triangle,
    /// Stand-alone station symbol
    Symbol,
}

/// A station symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub group: String,
    pub position: Vector2,
    pub shape: MarkerShape,
    /// Full dotted station name
    pub station: String,
    pub flags: StationFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    /// Short station name for display
    StationName,
    /// Full name attached to a station symbol
    Annotation,
}

/// Text anchored at a station.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub group: String,
    pub position: Vector2,
    pub text: String,
    pub kind: LabelKind,
    /// Full dotted station name
    pub station: String,
    pub flags: StationFlags,
}

/// One drawable item.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawPrimitive {
    Polyline(Polyline),
    Marker(Marker),
    Label(Label),
    ScaleBar(ScaleBar),
}

impl DrawPrimitive {
    /// Survey group of the primitive; the scale bar lives in the root group.
    pub fn group(&self) -> &str {
        match self {
            Self::Polyline(p) => &p.group,
            Self::Marker(m) => &m.group,
            Self::Label(l) => &l.group,
            Self::ScaleBar(_) => "",
        }
    }

    pub fn is_scale_bar(&self) -> bool {
        matches!(self, Self::ScaleBar(_))
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

struct Assembler<'a> {
    network: &'a Network,
    projection: &'a Projection,
    filter: &'a NameFilter,
    options: &'a DrawingOptions,
    output: Vec<DrawPrimitive>,
}

impl<'a> Assembler<'a> {
    fn point(&self, station: usize) -> Vector2 {
        self.projection
            .point(station)
            .map(|p| p.position())
            .unwrap_or_default()
    }

    fn shows_leg(&self, leg: &Leg) -> bool {
        let options = self.options;
        if (leg.is_surface() && !options.show_surface)
            || (leg.is_splay() && !options.show_splays)
            || (leg.is_duplicate() && !options.show_duplicates)
        {
            return false;
        }
        self.filter.accepts(&leg.from) && self.filter.accepts(&leg.to)
    }

    /// Emit polylines for `legs`, breaking where the pen would have to
    /// lift or the style changes.
    fn polylines(&mut self, group: &str, legs: &[usize]) {
        let network = self.network;
        let mut run: Option<(usize, Polyline)> = None;
        for &index in legs {
            let leg = &network.legs()[index];
            if !self.shows_leg(leg) {
                continue;
            }
            let (from, to) = network.leg_ends(leg);
            let style = LegStyle::from_flags(leg.flags);
            match run.as_mut() {
                Some((end, line)) if *end == from && line.style == style => {
                    line.points.push(self.point(to));
                    *end = to;
                }
                _ => {
                    if let Some((_, line)) = run.take() {
                        self.output.push(DrawPrimitive::Polyline(line));
                    }
                    run = Some((
                        to,
                        Polyline {
                            group: group.to_string(),
                            points: vec![self.point(from), self.point(to)],
                            style,
                        },
                    ));
                }
            }
        }
        if let Some((_, line)) = run {
            self.output.push(DrawPrimitive::Polyline(line));
        }
    }

    fn annotation_name(&self, name: &str) -> String {
        let shown = self.filter.display_name(name);
        match self.options.surveys {
            SurveyHandling::CreateOnDemand => names::therion_name(shown),
            SurveyHandling::Ignore => shown.to_string(),
        }
    }

    fn stations(&mut self, group: &str, stations: &[usize]) {
        let network = self.network;
        for &index in stations {
            let Some(station) = network.station_at(index) else {
                continue;
            };
            if !self.filter.accepts(&station.name)
                || (station.is_surface() && !station.is_underground() && !self.options.show_surface)
            {
                continue;
            }
            let position = self.point(index);

            let shape = match self.options.markers {
                MarkerScheme::None => None,
                MarkerScheme::Circle => Some(MarkerShape::Circle),
                MarkerScheme::Triangle => Some(MarkerShape::Triangle),
                MarkerScheme::TriangleSymbol => Some(MarkerShape::Symbol),
            };
            if let Some(shape) = shape {
                self.output.push(DrawPrimitive::Marker(Marker {
                    group: group.to_string(),
                    position,
                    shape,
                    station: station.name.clone(),
                    flags: station.flags,
                }));
            }
            if self.options.markers == MarkerScheme::TriangleSymbol {
                let text = self.annotation_name(&station.name);
                self.output.push(DrawPrimitive::Label(Label {
                    group: group.to_string(),
                    position,
                    text,
                    kind: LabelKind::Annotation,
                    station: station.name.clone(),
                    flags: station.flags,
                }));
            }

            let named = match self.options.station_names {
                LabelPolicy::Off => false,
                LabelPolicy::OutsideSurveys => station.survey().is_empty(),
                LabelPolicy::All => true,
            };
            if named {
                self.output.push(DrawPrimitive::Label(Label {
                    group: group.to_string(),
                    position,
                    text: names::leaf_of(self.filter.display_name(&station.name)).to_string(),
                    kind: LabelKind::StationName,
                    station: station.name.clone(),
                    flags: station.flags,
                }));
            }
        }
    }

    /// Sits below whatever was actually drawn, so stations the filter or
    /// the leg options removed do not push it away.
    fn scale_bar(&mut self) {
        let drawn = self.output.iter().flat_map(|p| match p {
            DrawPrimitive::Polyline(line) => line.points.clone(),
            DrawPrimitive::Marker(marker) => vec![marker.position],
            DrawPrimitive::Label(label) => vec![label.position],
            DrawPrimitive::ScaleBar(_) => Vec::new(),
        });
        let origin = match BoundingBox2D::from_points(drawn) {
            Some(bounds) => Vector2::new(bounds.min.x, bounds.min.y - SCALE_BAR_MARGIN),
            None => Vector2::ZERO,
        };
        self.output.push(DrawPrimitive::ScaleBar(ScaleBar::for_scale(
            &self.projection.scale(),
            origin,
        )));
    }

    fn run(mut self) -> Vec<DrawPrimitive> {
        let network = self.network;
        let all_legs: Vec<usize> = (0..network.legs().len()).collect();

        match self.options.surveys {
            SurveyHandling::Ignore => {
                let all_stations: Vec<usize> = (0..network.station_count()).collect();
                self.polylines("", &all_legs);
                self.stations("", &all_stations);
            }
            SurveyHandling::CreateOnDemand => {
                let tree = network.survey_tree();
                for id in tree.pre_order() {
                    let Some(node) = tree.node(id) else {
                        continue;
                    };
                    if self.options.break_on_survey {
                        self.polylines(&node.path, &node.legs);
                    } else if id == SurveyTree::ROOT {
                        self.polylines("", &all_legs);
                    }
                    self.stations(&node.path, &node.stations);
                }
            }
        }

        if self.options.scale_bar {
            self.scale_bar();
        }
        self.output
    }
}

/// Assemble the drawing of a projected network.
///
/// `projection` must come from [`project`](crate::projection::project) on
/// the same network; a projection of a different size is rejected with
/// [`FormatError::InvalidParameter`].
pub fn assemble(
    network: &Network,
    projection: &Projection,
    filter: &NameFilter,
    options: &DrawingOptions,
) -> Result<Vec<DrawPrimitive>> {
    if projection.len() != network.station_count() {
        return Err(FormatError::InvalidParameter(format!(
            "projection holds {} point(s) for {} station(s)",
            projection.len(),
            network.station_count()
        )));
    }
    let assembler = Assembler {
        network,
        projection,
        filter,
        options,
        output: Vec::new(),
    };
    Ok(assembler.run())
}
