//! Parsing road-table waypoint arrays.
//!
//! Run with: cargo test -p road-curves --features serde --test raw_waypoints

#![cfg(feature = "serde")]
#![allow(clippy::unwrap_used)]

use road_curves::{
    CurveError, CurveOptions, RawWaypoint, RoadPath, SplineMethod, Vector3, Waypoint,
    waypoints_from_raw,
};

#[test]
fn parse_compact_waypoints() {
    let json = r#"[
        [0, 0],
        [100.5, 20, 3],
        [200, 0, 4, {"straight": true}],
        [300, 10, {"tanIn": [1, 0, 0], "tanOut": [0, 2, 0]}],
        [400, 0, 0, null]
    ]"#;
    let raw: Vec<RawWaypoint> = serde_json::from_str(json).unwrap();
    assert_eq!(raw.len(), 5);
    assert!(raw[0].meta.is_none());
    assert_eq!(raw[3].coords, vec![300.0, 10.0]);
    assert!(raw[4].meta.is_none());

    let points = waypoints_from_raw(&raw).unwrap();
    assert_eq!(points[0], Waypoint::xy(0.0, 0.0));
    assert_eq!(points[1], Waypoint::xyz(100.5, 20.0, 3.0));
    assert!(points[2].meta.straight);
    assert_eq!(points[3].meta.tan_in, Some(Vector3::new(1.0, 0.0, 0.0)));
    assert_eq!(points[3].meta.tan_out, Some(Vector3::new(0.0, 2.0, 0.0)));

    let road = RoadPath::build(&points, SplineMethod::Bezier, &CurveOptions::default());
    assert!(road.is_ok_and(|r| r.len() == 5));
}

#[test]
fn serialize_round_trip_keeps_shape() {
    let json = r#"[1.0,2.0,3.0,{"straight":true}]"#;
    let raw: RawWaypoint = serde_json::from_str(json).unwrap();
    assert_eq!(serde_json::to_string(&raw).unwrap(), json);
}

#[test]
fn malformed_waypoints_are_rejected() {
    let raw: Vec<RawWaypoint> = serde_json::from_str("[[0, 0], [1]]").unwrap();
    assert_eq!(
        waypoints_from_raw(&raw),
        Err(CurveError::invalid_coordinates(1, 1))
    );

    let raw: Vec<RawWaypoint> =
        serde_json::from_str(r#"[[0, 0, 0, {"tanOut": [1, 0]}], [1, 1]]"#).unwrap();
    let err = waypoints_from_raw(&raw).unwrap_err();
    assert_eq!(err, CurveError::invalid_tangent(0, 2));
    assert!(err.is_invalid_input());

    assert!(serde_json::from_str::<RawWaypoint>(r#""not a waypoint""#).is_err());
}
