//! Subpath extraction on road curves.
//!
//! Run with: cargo test -p road-curves --test subpath

#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use road_curves::{CurveOptions, PathNode, Point3, RoadPath, SplineMethod, Waypoint};

// =============================================================================
// Helpers
// =============================================================================

fn diagonal(len: usize) -> Vec<Waypoint> {
    (0..len).map(|i| Waypoint::xy(i as f64, i as f64)).collect()
}

fn wavy(len: usize) -> Vec<Waypoint> {
    (0..len)
        .map(|i| {
            let x = i as f64 * 100.0;
            Waypoint::xyz(x, (x / 70.0).sin() * 40.0, (i % 3) as f64 * 5.0)
        })
        .collect()
}

fn road(points: &[Waypoint], method: SplineMethod) -> RoadPath {
    RoadPath::build(points, method, &CurveOptions::default()).unwrap()
}

fn assert_point_close(a: &Point3<f64>, b: &Point3<f64>, tolerance: f64) {
    assert!((a - b).norm() <= tolerance, "{a:?} != {b:?} (tolerance {tolerance})");
}

fn assert_nodes_close(a: &[PathNode], b: &[PathNode], tolerance: f64) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b) {
        assert_eq!(x.is_cubic(), y.is_cubic(), "{x:?} vs {y:?}");
        assert_point_close(x.end(), y.end(), tolerance);
        if let (Some((xc1, xc2)), Some((yc1, yc2))) = (x.controls(), y.controls()) {
            assert_point_close(xc1, yc1, tolerance);
            assert_point_close(xc2, yc2, tolerance);
        }
    }
}

// =============================================================================
// Concrete scenarios
// =============================================================================

#[test]
fn diagonal_bounds() {
    let road = road(&diagonal(4), SplineMethod::CatmullRom);
    let expect = [(0.0, 1.0), (0.5, 1.5), (1.0, 2.0)];
    for (rp, xy) in expect {
        let point = road.point_at_road_percent(rp).unwrap();
        assert_relative_eq!(point.x, xy, epsilon = 1e-12);
        assert_relative_eq!(point.y, xy, epsilon = 1e-12);
    }
}

#[test]
fn diagonal_full_subpath() {
    let road = road(&diagonal(4), SplineMethod::CatmullRom);
    let sub = road.subpath_at_road_percents(0.0, 1.0);
    assert_eq!(sub.len(), 2);
    assert_eq!(*sub.nodes()[0].end(), Point3::new(1.0, 1.0, 0.0));
    assert_eq!(*sub.nodes()[1].end(), Point3::new(2.0, 2.0, 0.0));
    assert_eq!(sub.offset_index(), 1);
    assert_eq!(sub.offset_percent(), 0.0);
    assert_eq!(sub.crop_percent(), 0.0);
    assert_eq!(sub.road_length(), 4);
}

#[test]
fn waypoint_percents_snap_to_nodes() {
    // 15/22 * 22 rounds to just under 15.
    let road = road(&diagonal(25), SplineMethod::CatmullRom);
    assert_eq!(road.road_percent_to_offset_tuple(15.0 / 22.0), (16, 0.0));

    let sub = road.subpath_at_road_percents(15.0 / 22.0, 1.0);
    assert_eq!(sub.len(), 8);
    assert_eq!(sub.offset_index(), 16);
    assert_eq!(sub.offset_percent(), 0.0);
    assert_eq!(sub.crop_percent(), 0.0);
    assert_eq!(*sub.nodes()[0].end(), Point3::new(16.0, 16.0, 0.0));
}

#[test]
fn tiny_overshoot_keeps_inner_nodes() {
    let road = road(&diagonal(6), SplineMethod::CatmullRom);
    for (start, end) in [(0.0, 1.0 + 1e-12), (-1e-12, 1.0), (-1e-12, 1.0 + 1e-12)] {
        let sub = road.subpath_at_road_percents(start, end);
        assert_eq!(sub.len(), 4, "{start} -> {end}");
        assert_eq!(sub.offset_index(), 1);
        assert_eq!(sub.offset_percent(), 0.0);
        assert_eq!(sub.crop_percent(), 0.0);
    }
}

// =============================================================================
// Invariants
// =============================================================================

#[test]
fn full_range_is_inner_nodes() {
    for method in [SplineMethod::CatmullRom, SplineMethod::Bezier] {
        for len in 3..=6 {
            let points = wavy(len);
            let road = road(&points, method);
            let sub = road.subpath_at_road_percents(0.0, 1.0);
            assert_eq!(sub.len(), len - 2, "road length {len}");
            for (node, wp) in sub.nodes().iter().zip(&points[1..]) {
                assert_eq!(*node.end(), wp.position);
            }
            // Inner nodes are copied untouched.
            assert_eq!(&sub.nodes()[1..], &road.nodes()[2..len - 1]);
        }
    }
}

#[test]
fn inverted_range_is_empty() {
    let road = road(&wavy(6), SplineMethod::CatmullRom);
    let sub = road.subpath_at_road_percents(0.7, 0.3);
    assert!(sub.is_empty());
    assert_eq!(sub.offset_index(), 0);
    assert_eq!(sub.road_length(), 6);
    assert_relative_eq!(sub.distance(), 0.0);
}

#[test]
fn equal_range_is_single_point() {
    let road = road(&wavy(6), SplineMethod::Bezier);
    let sub = road.subpath_at_road_percents(0.4, 0.4);
    assert_eq!(sub.len(), 1);
    assert_point_close(
        sub.nodes()[0].end(),
        &road.point_at_road_percent(0.4).unwrap(),
        1e-12,
    );
}

#[test]
fn near_boundary_keeps_full_length() {
    for method in [SplineMethod::CatmullRom, SplineMethod::Bezier] {
        let points = wavy(6);
        let road = road(&points, method);

        let sub = road.subpath_at_road_percents(1e-10, 1.0);
        assert_eq!(sub.len(), 4);
        assert_point_close(sub.nodes()[0].end(), &points[1].position, 1e-4);
        assert_point_close(sub.nodes()[3].end(), &points[4].position, 1e-9);

        let sub = road.subpath_at_road_percents(0.0, 1.0 - 1e-10);
        assert_eq!(sub.len(), 4);
        assert_point_close(sub.nodes()[0].end(), &points[1].position, 1e-9);
        assert_point_close(sub.nodes()[3].end(), &points[4].position, 1e-4);
    }
}

#[test]
fn cropped_ends_follow_the_curve() {
    let road = road(&wavy(6), SplineMethod::CatmullRom);
    let sub = road.subpath_at_road_percents(0.1, 0.8);

    let start = road.point_at_road_percent(0.1).unwrap();
    let end = road.point_at_road_percent(0.8).unwrap();
    assert_point_close(sub.nodes()[0].end(), &start, 1e-9);
    assert_point_close(sub.nodes()[sub.len() - 1].end(), &end, 1e-9);

    // Points inside the subpath are found on the subpath too.
    for rp in [0.1, 0.25, 0.5, 0.66, 0.8] {
        let on_road = road.point_at_road_percent(rp).unwrap();
        let on_sub = sub.point_at_road_percent(rp).unwrap();
        assert_point_close(&on_road, &on_sub, 1e-9);
    }

    // Resampling the cropped ends only moves the sampling error around.
    let expected = road.distance_at_road_percent(0.8) - road.distance_at_road_percent(0.1);
    assert_relative_eq!(sub.distance(), expected, epsilon = 1e-4);
}

#[test]
fn subpath_within_one_node() {
    let road = road(&wavy(6), SplineMethod::Bezier);
    // Offsets 1.3 .. 1.75, both inside node 1.
    let sub = road.subpath_at_road_percents(0.1, 0.25);
    assert_eq!(sub.len(), 2);
    assert_eq!(sub.offset_index(), 1);
    assert_relative_eq!(sub.offset_percent(), 0.3, epsilon = 1e-12);
    assert_relative_eq!(sub.crop_percent(), 0.75, epsilon = 1e-12);

    for rp in [0.1, 0.15, 0.2, 0.25] {
        let on_road = road.point_at_road_percent(rp).unwrap();
        let on_sub = sub.point_at_road_percent(rp).unwrap();
        assert_point_close(&on_road, &on_sub, 1e-9);
    }
}

#[test]
fn subpath_of_subpath_is_stable() {
    let ranges = [
        (0.0, 1.0),
        (0.1, 0.9),
        (0.1, 0.25),
        (0.34, 0.66),
        (-0.2, 0.5),
        (0.5, 1.2),
        (0.6, 0.6),
    ];
    for method in [SplineMethod::CatmullRom, SplineMethod::Bezier] {
        let road = road(&wavy(6), method);
        for (start, end) in ranges {
            let once = road.subpath_at_road_percents(start, end);
            let twice = once.subpath_at_road_percents(start, end);
            assert_eq!(twice.road_length(), once.road_length());
            assert_eq!(twice.offset_index(), once.offset_index(), "{start}..{end}");
            assert_eq!(twice.offset_percent(), once.offset_percent(), "{start}..{end}");
            assert_eq!(twice.crop_percent(), once.crop_percent(), "{start}..{end}");
            assert_nodes_close(twice.nodes(), once.nodes(), 1e-4);
        }
    }
}

#[test]
fn mirrored_subpath_is_symmetric() {
    for method in [SplineMethod::CatmullRom, SplineMethod::Bezier] {
        let road = road(&wavy(7), method);
        let reversed = road.to_reversed().unwrap();
        for (start, end) in [(0.0, 1.0), (0.1, 0.9), (0.2, 0.45), (0.05, 0.1)] {
            let forward = road.subpath_at_road_percents(start, end);
            let backward = reversed.subpath_at_road_percents(1.0 - end, 1.0 - start);

            let f = forward.nodes();
            let b = backward.nodes();
            assert_point_close(f[0].end(), b[b.len() - 1].end(), 1e-6);
            assert_point_close(f[f.len() - 1].end(), b[0].end(), 1e-6);
            assert_relative_eq!(forward.distance(), backward.distance(), epsilon = 1e-6);
        }
    }
}

#[test]
fn road_time_subpath_matches_percent() {
    let road = road(&wavy(6), SplineMethod::CatmullRom);
    let by_time = road.subpath_at_road_times(255_000.0, 755_000.0);
    let by_percent = road.subpath_at_road_percents(0.25, 0.75);
    assert_eq!(by_time, by_percent);
}
