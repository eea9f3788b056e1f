//! Reversal of curves built by both construction methods.

#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use road_curves::{CurveOptions, CurvePath, SplineMethod, Waypoint, build_curve};

const METHODS: [SplineMethod; 2] = [SplineMethod::CatmullRom, SplineMethod::Bezier];

fn points_2d() -> Vec<Waypoint> {
    vec![
        Waypoint::xy(0.0, 0.0),
        Waypoint::xy(10.0, 5.0),
        Waypoint::xy(20.0, -3.0),
        Waypoint::xy(35.0, 0.0),
        Waypoint::xy(40.0, 12.0),
    ]
}

fn points_3d() -> Vec<Waypoint> {
    vec![
        Waypoint::xyz(0.0, 0.0, 0.0),
        Waypoint::xyz(10.0, 5.0, 1.0),
        Waypoint::xyz(20.0, -3.0, 2.5),
        Waypoint::xyz(35.0, 0.0, 2.0),
        Waypoint::xyz(40.0, 12.0, -1.0),
    ]
}

/// Every variant of a point set: no override, then a straight override at
/// each position in turn.
fn with_straight_variants(points: &[Waypoint]) -> Vec<Vec<Waypoint>> {
    let mut variants = vec![points.to_vec()];
    for i in 0..points.len() {
        let mut pts = points.to_vec();
        pts[i] = pts[i].with_straight(true);
        variants.push(pts);
    }
    variants
}

fn assert_reversal_involution(curve: &CurvePath) {
    let reversed = curve.reversed();
    assert_eq!(reversed.len(), curve.len());
    assert_eq!(reversed.start(), curve.end());
    assert_eq!(reversed.end(), curve.start());
    assert_eq!(reversed.reversed().nodes(), curve.nodes());
}

#[test]
fn reverse_2d() {
    for method in METHODS {
        for points in with_straight_variants(&points_2d()) {
            let curve = build_curve(&points, method, &CurveOptions::default()).unwrap();
            assert_reversal_involution(&curve);
        }
    }
}

#[test]
fn reverse_3d() {
    for method in METHODS {
        for points in with_straight_variants(&points_3d()) {
            let curve = build_curve(&points, method, &CurveOptions::default()).unwrap();
            assert_reversal_involution(&curve);
        }
    }
}

#[test]
fn reverse_looped() {
    for method in METHODS {
        let opts = CurveOptions::default().with_looped(true);
        let curve = build_curve(&points_3d(), method, &opts).unwrap();
        assert_reversal_involution(&curve);
        assert!(curve.reversed().looped());
    }
}

#[test]
fn reverse_preserves_shape() {
    for method in METHODS {
        let curve = build_curve(&points_3d(), method, &CurveOptions::default()).unwrap();
        let reversed = curve.reversed();
        assert_relative_eq!(reversed.distance(), curve.distance(), epsilon = 1e-9);

        // Node types move with their segments.
        let n = curve.len();
        for i in 1..n {
            assert_eq!(curve.nodes()[i].is_cubic(), reversed.nodes()[n - i].is_cubic());
        }

        let forward = curve.flatten(0.01);
        let mut backward = reversed.flatten(0.01);
        backward.reverse();
        assert_eq!(forward.first(), backward.first());
        assert_eq!(forward.last(), backward.last());
    }
}
