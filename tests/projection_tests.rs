//! Integration tests for plan, elevation and extended projection

mod common;

use common::builders::FixtureWriter;
use common::{assert_close, decode_fixture, project_with};
use proptest::prelude::*;
use speleodraw::projection::rotate;
use speleodraw::{project, FormatError, Leg, Network, ProjectionParams, Scale, Station, Vector3, View};

fn unit(view: View) -> ProjectionParams {
    ProjectionParams::new(view).with_scale(Scale::new(1.0, 1.0))
}

fn network(points: &[(f64, f64, f64)], chained: bool) -> Network {
    let mut b = Network::builder();
    for (i, &(x, y, z)) in points.iter().enumerate() {
        b.add_station(Station::new(format!("p.{i}"), Vector3::new(x, y, z)))
            .unwrap();
    }
    if chained {
        for i in 1..points.len() {
            b.add_leg(Leg::new(format!("p.{}", i - 1), format!("p.{i}")));
        }
    }
    b.build().unwrap()
}

#[test]
fn test_bearing_zero_is_coordinate_permutation() {
    let net = network(&[(1.5, -2.0, 3.25), (-7.0, 4.0, -0.5)], true);

    let plan = project_with(&net, &unit(View::Plan));
    let elevation = project_with(&net, &unit(View::Elevation));
    for (i, s) in net.stations().enumerate() {
        let p = plan.point(i).unwrap();
        assert_close(p.x, s.position.x);
        assert_close(p.y, s.position.y);

        let e = elevation.point(i).unwrap();
        assert_close(e.x, s.position.x);
        assert_close(e.y, s.position.z);
    }
}

#[test]
fn test_full_turn_is_identity() {
    for &(e, n) in &[(1.0, 0.0), (0.0, 1.0), (123.456, -789.012), (-5e4, 3e4)] {
        let (x, y) = rotate(e, n, 360.0);
        assert!((x - e).abs() < 1e-9 * e.abs().max(1.0));
        assert!((y - n).abs() < 1e-9 * n.abs().max(1.0));
    }
}

#[test]
fn test_quarter_turn_keeps_distances() {
    let net = network(&[(0.0, 0.0, 0.0), (3.0, 4.0, 0.0)], true);
    let plan = project_with(&net, &unit(View::Plan).with_bearing(90.0));
    let a = plan.point(0).unwrap().position();
    let b = plan.point(1).unwrap().position();
    assert_close(a.distance(&b), 5.0);
}

#[test]
fn test_extended_chain_unrolls() {
    let net = network(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (10.0, 15.0, -2.0)], true);
    let ext = project_with(&net, &unit(View::Extended));
    let xs: Vec<f64> = ext.points().iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.0, 10.0, 25.0]);
    assert_close(ext.point(2).unwrap().y, -2.0);
}

#[test]
fn test_scale_factor_applies() {
    let net = network(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0)], true);
    // 10 m at 1:100 is 100 mm
    let plan = project_with(&net, &ProjectionParams::new(View::Plan).with_scale(Scale::ratio(100.0)));
    assert_close(plan.point(1).unwrap().x, 100.0);
    assert_close(plan.point(1).unwrap().scale, 10.0);
    assert_eq!(plan.scale(), Scale::ratio(100.0));
}

#[test]
fn test_invalid_parameters() {
    let net = network(&[(0.0, 0.0, 0.0)], false);
    let bad = [
        ProjectionParams::default().with_scale(Scale::new(1e-300, 1e300)),
        ProjectionParams::default().with_bearing(360.0),
        ProjectionParams::default().with_bearing(-1.0),
        ProjectionParams::default().with_bearing(f64::NAN),
        ProjectionParams::default().with_scale(Scale::ratio(0.0)),
        ProjectionParams::default().with_scale(Scale::new(100.0, f64::INFINITY)),
    ];
    for params in bad {
        assert!(
            matches!(project(&net, &params), Err(FormatError::InvalidParameter(_))),
            "{params:?}"
        );
    }
}

#[test]
fn test_extended_file_is_drawn_as_elevation() {
    let mut w = FixtureWriter::new(8).file_flags(0x80);
    w.move_to([0, 0, 0])
        .line_to("x", [1000, 2000, -300], 0)
        .label("x.1", [0, 0, 0], 0)
        .label("x.2", [1000, 2000, -300], 0);
    let net = decode_fixture(&w.finish());

    let projection = project_with(&net, &unit(View::Plan).with_bearing(45.0));
    assert_eq!(projection.view(), View::Elevation);
    assert_eq!(projection.bearing(), 0.0);
    assert_close(projection.point(1).unwrap().x, 10.0);
    assert_close(projection.point(1).unwrap().y, -3.0);
}

#[test]
fn test_out_of_range_positions_are_rejected() {
    let net = network(&[(0.0, 0.0, 0.0), (1.7e308, -1.7e308, 0.0)], true);
    let err = project(&net, &unit(View::Plan).with_bearing(45.0)).unwrap_err();
    assert!(matches!(err, FormatError::InvalidParameter(_)));

    // unrolled length overflows even though every station is in range
    let net = network(&[(-1.7e308, 0.0, 0.0), (1.7e308, 0.0, 0.0)], true);
    let err = project(&net, &unit(View::Extended)).unwrap_err();
    assert!(matches!(err, FormatError::InvalidParameter(_)));
}

#[test]
fn test_empty_network_has_no_bounds() {
    let net = Network::builder().build().unwrap();
    let projection = project_with(&net, &ProjectionParams::default());
    assert!(projection.is_empty());
    assert!(projection.bounds().is_none());
}

/// Any finite value, extremes included.
fn finite() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1e6..1e6f64,
        prop::num::f64::NORMAL | prop::num::f64::SUBNORMAL | prop::num::f64::ZERO,
        Just(f64::MAX),
        Just(-f64::MAX),
    ]
}

fn views() -> impl Strategy<Value = View> {
    prop_oneof![Just(View::Plan), Just(View::Elevation), Just(View::Extended)]
}

proptest! {
    #[test]
    fn prop_finite_input_gives_finite_output(
        points in prop::collection::vec((-1e6..1e6f64, -1e6..1e6f64, -1e4..1e4f64), 1..12),
        chained in any::<bool>(),
        view in views(),
        bearing in 0.0..360.0f64,
        denominator in 1.0..1e6f64,
    ) {
        // distinct names, coordinates may repeat
        let net = network(&points, chained);
        let params = ProjectionParams::new(view)
            .with_bearing(bearing)
            .with_scale(Scale::ratio(denominator));
        let projection = project(&net, &params).unwrap();
        prop_assert_eq!(projection.len(), points.len());
        for p in projection.points() {
            prop_assert!(p.x.is_finite() && p.y.is_finite());
        }
    }

    #[test]
    fn prop_extreme_input_is_finite_or_rejected(
        points in prop::collection::vec((finite(), finite(), finite()), 1..8),
        chained in any::<bool>(),
        view in views(),
        bearing in 0.0..360.0f64,
        denominator in finite(),
        units_per_metre in finite(),
    ) {
        let net = network(&points, chained);
        let params = ProjectionParams::new(view)
            .with_bearing(bearing)
            .with_scale(Scale::new(denominator, units_per_metre));
        match project(&net, &params) {
            Ok(projection) => {
                prop_assert_eq!(projection.len(), points.len());
                for p in projection.points() {
                    prop_assert!(p.x.is_finite() && p.y.is_finite() && p.scale.is_finite());
                }
            }
            Err(FormatError::InvalidParameter(_)) => {}
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }

    #[test]
    fn prop_rotation_preserves_length(
        e in -1e5..1e5f64,
        n in -1e5..1e5f64,
        bearing in 0.0..360.0f64,
    ) {
        let (x, y) = rotate(e, n, bearing);
        prop_assert!((x.hypot(y) - e.hypot(n)).abs() < 1e-6);
    }
}
