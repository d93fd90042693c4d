//! Projection of a network onto the drawing plane.
//!
//! Three views are supported:
//!
//! - **Plan**: looking down, rotated by a bearing
//! - **Elevation**: looking horizontally along the bearing, `y` is altitude
//! - **Extended**: the centreline unrolled so that `x` is the running
//!   horizontal distance along legs
//!
//! All outputs are in document units with `y` pointing up, one
//! [`ProjectedPoint`] per station in decode order.

mod extended;

use nalgebra::{Rotation2, Vector2 as Planar};

use crate::error::{FormatError, Result};
use crate::network::Network;
use crate::types::{BoundingBox2D, Vector2};

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Projection view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Plan,
    Elevation,
    Extended,
}

/// Drawing scale `1:N` together with the document unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    /// `N` in `1:N`
    pub denominator: f64,
    /// Document units per metre of paper (1000 for millimetres)
    pub units_per_metre: f64,
}

impl Scale {
    pub const MILLIMETRES: f64 = 1000.0;

    pub fn new(denominator: f64, units_per_metre: f64) -> Self {
        Self {
            denominator,
            units_per_metre,
        }
    }

    /// `1:N` in millimetre document units.
    pub fn ratio(denominator: f64) -> Self {
        Self::new(denominator, Self::MILLIMETRES)
    }

    /// Document units per metre of cave.
    pub fn factor(&self) -> f64 {
        self.units_per_metre / self.denominator
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.denominator.is_finite() && self.denominator > 0.0) {
            return Err(FormatError::InvalidParameter(format!(
                "scale 1:{} is not a positive ratio",
                self.denominator
            )));
        }
        if !(self.units_per_metre.is_finite() && self.units_per_metre > 0.0) {
            return Err(FormatError::InvalidParameter(format!(
                "{} document units per metre",
                self.units_per_metre
            )));
        }
        let factor = self.factor();
        if !(factor.is_finite() && factor > 0.0) {
            return Err(FormatError::InvalidParameter(format!(
                "scale 1:{} at {} units per metre gives factor {}",
                self.denominator, self.units_per_metre, factor
            )));
        }
        Ok(())
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::ratio(100.0)
    }
}

/// Parameters of one projection run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProjectionParams {
    pub view: View,
    /// Degrees clockwise from north, `[0, 360)`
    pub bearing: f64,
    pub scale: Scale,
}

impl ProjectionParams {
    pub fn new(view: View) -> Self {
        Self {
            view,
            ..Default::default()
        }
    }

    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = bearing;
        self
    }

    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.bearing.is_finite() && (0.0..360.0).contains(&self.bearing)) {
            return Err(FormatError::InvalidParameter(format!(
                "bearing {} outside [0, 360)",
                self.bearing
            )));
        }
        self.scale.validate()
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A station's position on the drawing plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
    /// Scale factor that was applied
    pub scale: f64,
}

impl ProjectedPoint {
    pub fn position(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }
}

/// Projected stations of one network, indexed like [`Network::station_at`].
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    view: View,
    bearing: f64,
    scale: Scale,
    points: Vec<ProjectedPoint>,
}

impl Projection {
    /// View that was actually applied.
    pub fn view(&self) -> View {
        self.view
    }

    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn point(&self, station: usize) -> Option<&ProjectedPoint> {
        self.points.get(station)
    }

    pub fn points(&self) -> &[ProjectedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box of all projected stations
    pub fn bounds(&self) -> Option<BoundingBox2D> {
        BoundingBox2D::from_points(self.points.iter().map(ProjectedPoint::position))
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Rotate an (east, north) pair by a bearing in degrees:
/// `x' = e·cosθ − n·sinθ`, `y' = e·sinθ + n·cosθ`.
pub fn rotate(east: f64, north: f64, bearing: f64) -> (f64, f64) {
    let rotated = Rotation2::new(bearing.to_radians()) * Planar::new(east, north);
    (rotated.x, rotated.y)
}

/// Project every station of `network`.
pub fn project(network: &Network, params: &ProjectionParams) -> Result<Projection> {
    params.validate()?;

    // an already unrolled file is drawn as it is
    let (view, bearing) = if network.is_extended_elevation {
        (View::Elevation, 0.0)
    } else {
        (params.view, params.bearing)
    };

    let raw: Vec<Vector2> = match view {
        View::Plan => network
            .stations()
            .map(|s| {
                let (x, y) = rotate(s.position.x, s.position.y, bearing);
                Vector2::new(x, y)
            })
            .collect(),
        View::Elevation => network
            .stations()
            .map(|s| {
                let (x, _) = rotate(s.position.x, s.position.y, bearing);
                Vector2::new(x, s.position.z)
            })
            .collect(),
        View::Extended => extended::unroll(network),
    };

    let factor = params.scale.factor();
    let mut points = Vec::with_capacity(raw.len());
    for (index, p) in raw.into_iter().enumerate() {
        let point = ProjectedPoint {
            x: p.x * factor,
            y: p.y * factor,
            scale: factor,
        };
        if !point.position().is_finite() {
            let name = network.station_at(index).map_or("?", |s| s.name.as_str());
            return Err(FormatError::InvalidParameter(format!(
                "station '{}' projects outside the representable range",
                name
            )));
        }
        points.push(point);
    }

    Ok(Projection {
        view,
        bearing,
        scale: params.scale,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Leg, Station};
    use crate::types::Vector3;

    fn unit() -> Scale {
        Scale::new(1.0, 1.0)
    }

    fn single(x: f64, y: f64, z: f64) -> Network {
        let mut b = Network::builder();
        b.add_station(Station::new("a", Vector3::new(x, y, z))).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn test_scale_factor() {
        assert_eq!(Scale::ratio(500.0).factor(), 2.0);
        assert_eq!(Scale::default().denominator, 100.0);
        assert!(Scale::ratio(0.0).validate().is_err());
        assert!(Scale::ratio(-5.0).validate().is_err());
        assert!(Scale::new(100.0, f64::NAN).validate().is_err());
        // each part in range, the ratio overflows or vanishes
        assert!(Scale::new(1e-300, 1e300).validate().is_err());
        assert!(Scale::new(1e300, 1e-300).validate().is_err());
    }

    #[test]
    fn test_overflowing_scale_is_rejected() {
        let mut b = Network::builder();
        b.add_station(Station::new("a", Vector3::new(0.0, 0.0, 0.0))).unwrap();
        b.add_station(Station::new("b", Vector3::new(1.0, 2.0, 0.0))).unwrap();
        let net = b.build().unwrap();
        let params = ProjectionParams::new(View::Plan).with_scale(Scale::new(1e-300, 1e300));
        assert!(matches!(project(&net, &params), Err(FormatError::InvalidParameter(_))));
    }

    #[test]
    fn test_rotation_overflow_is_rejected() {
        let net = single(1.7e308, -1.7e308, 0.0);
        let params = ProjectionParams::new(View::Plan)
            .with_bearing(45.0)
            .with_scale(unit());
        let err = project(&net, &params).unwrap_err();
        assert!(matches!(err, FormatError::InvalidParameter(ref m) if m.contains("'a'")));
    }

    #[test]
    fn test_bearing_range() {
        let base = ProjectionParams::default();
        assert!(base.with_bearing(359.9).validate().is_ok());
        assert!(base.with_bearing(360.0).validate().is_err());
        assert!(base.with_bearing(-0.1).validate().is_err());
        assert!(base.with_bearing(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let (x, y) = rotate(1.0, 0.0, 90.0);
        assert!(x.abs() < 1e-12);
        assert!((y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_plan_applies_scale() {
        let net = single(2.0, 3.0, 4.0);
        let params = ProjectionParams::new(View::Plan).with_scale(Scale::ratio(1000.0));
        let p = project(&net, &params).unwrap();
        assert_eq!(p.point(0).unwrap().position(), Vector2::new(2.0, 3.0));
        assert_eq!(p.point(0).unwrap().scale, 1.0);
    }

    #[test]
    fn test_elevation_uses_altitude() {
        let net = single(2.0, 3.0, -4.0);
        let params = ProjectionParams::new(View::Elevation).with_scale(unit());
        let p = project(&net, &params).unwrap();
        assert_eq!(p.point(0).unwrap().position(), Vector2::new(2.0, -4.0));
    }

    #[test]
    fn test_extended_file_drawn_as_elevation() {
        let mut b = Network::builder().extended_elevation(true);
        b.add_station(Station::new("a", Vector3::new(5.0, 1.0, 2.0))).unwrap();
        b.add_station(Station::new("b", Vector3::new(9.0, 1.0, 0.0))).unwrap();
        b.add_leg(Leg::new("a", "b"));
        let net = b.build().unwrap();

        let params = ProjectionParams::new(View::Plan)
            .with_bearing(45.0)
            .with_scale(unit());
        let p = project(&net, &params).unwrap();
        assert_eq!(p.view(), View::Elevation);
        assert_eq!(p.bearing(), 0.0);
        assert_eq!(p.point(1).unwrap().position(), Vector2::new(9.0, 0.0));
    }
}
