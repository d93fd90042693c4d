//! Integration tests for 3D file decoding

mod common;

use common::builders::{equated_fixture, minimal_fixture, two_survey_fixture, FixtureWriter};
use common::{assert_close, decode_fixture, ALL_VERSIONS};
use speleodraw::io::survex::{DecoderConfiguration, NetworkDecoder, SurvexReader};
use speleodraw::{decode_all, decode_bytes, decode_stream, FormatError, FormatVersion, LegFlags, NotificationType, Vector3};

#[test]
fn test_minimal_fixture_every_version() {
    for version in ALL_VERSIONS {
        let net = decode_fixture(&minimal_fixture(version));
        assert_eq!(net.version.map(|v| v.number()), Some(version));
        assert_eq!(net.station_count(), 2, "v{version}");

        let names: Vec<&str> = net.stations().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["cave.1", "cave.2"], "v{version}");
        assert_eq!(net.station("cave.1").unwrap().position, Vector3::ZERO);
        assert_eq!(net.station("cave.2").unwrap().position, Vector3::new(10.0, 5.0, -2.5));
        assert!(net.station("cave.2").unwrap().is_underground());

        assert_eq!(net.legs().len(), 1, "v{version}");
        assert_eq!(net.legs()[0].ends(), ("cave.1", "cave.2"));
        assert_eq!(net.legs()[0].survey, "cave");
        assert!(net.notifications().is_empty());
    }
}

#[test]
fn test_one_byte_short_is_truncated() {
    for version in ALL_VERSIONS {
        let data = minimal_fixture(version);
        let err = decode_bytes(&data[..data.len() - 1]).unwrap_err();
        assert!(
            matches!(err, FormatError::TruncatedData { .. }),
            "v{version}: {err}"
        );
    }
}

#[test]
fn test_every_v8_body_prefix_is_truncated() {
    let data = two_survey_fixture(8);
    let start = FixtureWriter::new(8).preamble().len();
    for cut in start..data.len() {
        let err = decode_bytes(&data[..cut]).unwrap_err();
        assert!(matches!(err, FormatError::TruncatedData { .. }), "cut at {cut}: {err}");
    }
}

#[test]
fn test_unsupported_versions() {
    for line in ["v2", "v9", "Bv0.01"] {
        let data = format!("Survex 3D Image File\n{line}\ntitle\n@0\n\x00").into_bytes();
        assert!(matches!(decode_bytes(&data), Err(FormatError::UnsupportedFormat(_))));
    }
    assert!(matches!(
        decode_bytes(b"not a survey file at all\n"),
        Err(FormatError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_leg_to_unlabelled_point_is_dangling() {
    for version in ALL_VERSIONS {
        let mut w = FixtureWriter::new(version);
        w.move_to([0, 0, 0])
            .line_to("cave", [100, 0, 0], 0)
            .label("cave.1", [0, 0, 0], 0);
        let err = decode_bytes(&w.finish()).unwrap_err();
        assert!(matches!(err, FormatError::DanglingReference { .. }), "v{version}: {err}");
    }
}

#[test]
fn test_two_surveys() {
    for version in ALL_VERSIONS {
        let net = decode_fixture(&two_survey_fixture(version));
        assert_eq!(net.station_count(), 5);
        assert_eq!(net.legs().len(), 4);

        let tree = net.survey_tree();
        let paths: Vec<&str> = tree
            .pre_order()
            .into_iter()
            .filter_map(|id| tree.node(id))
            .map(|n| n.path.as_str())
            .collect();
        assert_eq!(paths, vec!["", "sys", "sys.a", "sys.b"]);
        assert_eq!(tree.find("sys.a").unwrap().stations.len(), 4);
        assert_eq!(tree.find("sys.a").unwrap().legs.len(), 3);

        let splays = net.legs().iter().filter(|l| l.is_splay()).count();
        assert_eq!(splays, 1);
        assert!(net.station("sys.a.1").unwrap().is_entrance());
        assert_close(net.depth(), 3.0);
        let centreline = 10.0 + 226f64.sqrt() + 68f64.sqrt();
        assert_close(net.length(LegFlags::SPLAY), centreline);
        assert_close(net.length(LegFlags::empty()), centreline + 1.5);
    }
}

#[test]
fn test_equated_leg_ends_stay_in_survey() {
    for version in ALL_VERSIONS {
        let net = decode_fixture(&equated_fixture(version));
        assert_eq!(net.station_count(), 4, "v{version}");
        assert_eq!(net.legs()[0].ends(), ("sys.a.1", "sys.a.2"), "v{version}");
        assert_eq!(net.legs()[1].ends(), ("sys.b.0", "sys.b.1"), "v{version}");
        assert_eq!(net.legs()[1].survey, "sys.b");
    }
}

#[test]
fn test_v8_unlabelled_line_keeps_survey() {
    let mut w = FixtureWriter::new(8);
    w.move_to([0, 0, 0])
        .line_to("s", [100, 0, 0], 0)
        .line_to_same_label([200, 0, 0], 0)
        .label("s.0", [0, 0, 0], 0)
        .label("s.1", [100, 0, 0], 0)
        .label("s.2", [200, 0, 0], 0);
    let net = decode_fixture(&w.finish());
    assert_eq!(net.legs().len(), 2);
    assert!(net.legs().iter().all(|l| l.survey == "s"));
    assert_eq!(net.legs()[1].ends(), ("s.1", "s.2"));
}

#[test]
fn test_dates_follow_legs() {
    for version in [7, 8] {
        let mut w = FixtureWriter::new(version);
        w.date_days(41148)
            .move_to([0, 0, 0])
            .line_to("d", [100, 0, 0], 0)
            .label("d.1", [0, 0, 0], 0)
            .label("d.2", [100, 0, 0], 0);
        let net = decode_fixture(&w.finish());
        let date = net.legs()[0].date.expect("dated leg");
        assert_eq!(date.first.to_string(), "2012-08-29");
        assert_eq!(date.first, date.last);
    }
}

#[test]
fn test_extended_elevation_detection() {
    let mut w = FixtureWriter::new(5).title("Cave (extended)");
    w.label("a", [0, 0, 0], 0);
    let net = decode_fixture(&w.finish());
    assert!(net.is_extended_elevation);
    assert_eq!(net.title, "Cave (extended)");

    let mut w = FixtureWriter::new(8).file_flags(0x80);
    w.label("a", [0, 0, 0], 0);
    assert!(decode_fixture(&w.finish()).is_extended_elevation);

    assert!(!decode_fixture(&minimal_fixture(8)).is_extended_elevation);
}

#[test]
fn test_v8_reserved_items() {
    let mut w = FixtureWriter::new(8);
    w.raw(&[0x1A]).label("a", [0, 0, 0], 0);
    let data = w.finish();

    let net = decode_fixture(&data);
    assert_eq!(net.station_count(), 1);
    let skipped: Vec<_> = net
        .notifications()
        .iter()
        .filter(|n| n.notification_type == NotificationType::Skipped)
        .collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].offset, Some(FixtureWriter::new(8).preamble().len() + 1));

    let strict = DecoderConfiguration::default().with_skip_unknown_items(false);
    let err = NetworkDecoder::new(SurvexReader::open(data).unwrap())
        .with_configuration(strict)
        .decode()
        .unwrap_err();
    assert!(matches!(err, FormatError::CorruptRecord { .. }));
}

#[test]
fn test_decode_stream_matches_bytes() {
    let data = two_survey_fixture(6);
    let from_stream = decode_stream(std::io::Cursor::new(data.clone())).unwrap();
    assert_eq!(from_stream, decode_bytes(&data).unwrap());
    assert_eq!(from_stream.version, Some(FormatVersion::V6));
}

#[test]
fn test_decode_all_in_parallel() {
    let mut inputs: Vec<Vec<u8>> = ALL_VERSIONS.iter().map(|&v| minimal_fixture(v)).collect();
    inputs.push(b"garbage".to_vec());
    let results = decode_all(&inputs);
    assert_eq!(results.len(), 7);
    for (result, version) in results.iter().zip(ALL_VERSIONS) {
        assert_eq!(result.as_ref().unwrap().version.map(|v| v.number()), Some(version));
    }
    assert!(results[6].is_err());
}
