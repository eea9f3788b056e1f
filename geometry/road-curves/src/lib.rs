//! Road-curve geometry: smooth road paths from sparse waypoints.
//!
//! Roads are stored as short lists of 3D waypoints. This crate turns them
//! into curves and answers the questions the rest of the system asks about
//! positions on a road:
//!
//! - [`build_curve`] / [`RoadPath::build`]: uniform Catmull-Rom or smoothed
//!   cubic Bézier construction, with closed loops and per-waypoint
//!   `straight` / tangent overrides.
//! - [`CurvePath`]: ordered [`PathNode`]s with epsilon-step tracing, arc
//!   length, point-at-distance, reversal, slicing and concatenation.
//! - [`RoadPath`]: road-mode curve addressed by *road percent* (and the
//!   game's *road time* encoding), with bounds queries, subpath extraction
//!   and distance-at-percent.
//!
//! # Example
//!
//! ```
//! use road_curves::{CurveOptions, RoadPath, SplineMethod, Waypoint};
//!
//! let points = [
//!     Waypoint::xyz(0.0, 0.0, 0.0),
//!     Waypoint::xyz(100.0, 20.0, 1.0),
//!     Waypoint::xyz(200.0, 0.0, 2.0),
//!     Waypoint::xyz(300.0, -20.0, 1.0),
//!     Waypoint::xyz(400.0, 0.0, 0.0),
//! ];
//! let road = RoadPath::build(&points, SplineMethod::CatmullRom, &CurveOptions::default())?;
//!
//! // The middle half of the road, as its own curve.
//! let sub = road.subpath_at_road_percents(0.25, 0.75);
//! assert!(sub.includes_road_percent(0.5));
//! assert!(!sub.includes_road_percent(0.9));
//!
//! // Distances agree whichever way they are measured.
//! let d = road.distance_at_road_percent(0.75) - road.distance_at_road_percent(0.25);
//! assert!((d - sub.distance()).abs() < 1e-3);
//! # Ok::<(), road_curves::CurveError>(())
//! ```
//!
//! # Coordinate System
//!
//! Positions are [`Point3<f64>`] in road units (the game uses centimetres).
//! 2D waypoints lie in the `z = 0` plane.
//!
//! # Layer 0 Crate
//!
//! Pure computation with no I/O. Every transformation returns a new value,
//! so one cached road curve can be shared between readers.
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for all types, including
//!   the compact array form of [`RawWaypoint`] used by road tables.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::suboptimal_flops,
    clippy::while_float,
    clippy::missing_const_for_fn,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::option_if_let_else,
    clippy::float_cmp,
    clippy::neg_cmp_op_on_partial_ord,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::return_self_not_must_use
)]

mod bezier;
mod build;
mod error;
mod node;
mod path;
mod road;
mod waypoint;

pub use bezier::{CubicBezier, bezier_control, lerp, steps_for_epsilon, vec_dist};
pub use build::{
    CurveOptions, DEFAULT_SMOOTHING, SplineMethod, build_curve, catmull_rom_path,
    cubic_bezier_path,
};
pub use error::CurveError;
pub use node::PathNode;
pub use path::{CurvePath, DEFAULT_EPSILON, TraceControl, TraceStep};
pub use road::{
    MIN_ROAD_LENGTH, ROAD_TIME_OFFSET, ROAD_TIME_SCALE, RoadBounds, RoadPath,
    road_offset_to_percent, road_offset_to_time, road_percent_to_offset,
    road_percent_to_offset_tuple, road_percent_to_time, road_time_to_percent,
};
pub use waypoint::{RawWaypoint, RawWaypointMeta, Waypoint, WaypointMeta, waypoints_from_raw};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

/// Result type for road-curve operations.
pub type Result<T> = std::result::Result<T, CurveError>;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use approx::assert_relative_eq;

    fn waypoints() -> Vec<Waypoint> {
        vec![
            Waypoint::xyz(0.0, 0.0, 0.0),
            Waypoint::xyz(10.0, 1.0, 0.5),
            Waypoint::xyz(20.0, 0.0, 1.0),
            Waypoint::xyz(30.0, -1.0, 0.0),
            Waypoint::xyz(40.0, 0.0, 0.0),
        ]
    }

    /// Both construction methods produce paths that pass through every
    /// waypoint and measure the same way through every entry point.
    #[test]
    fn test_methods_consistent() {
        for method in [SplineMethod::CatmullRom, SplineMethod::Bezier] {
            let opts = CurveOptions::default();
            let curve = build_curve(&waypoints(), method, &opts);
            let road = RoadPath::build(&waypoints(), method, &opts);
            let (Ok(curve), Ok(road)) = (curve, road) else {
                panic!("construction failed for {method:?}");
            };

            assert_eq!(road.path(), &curve);
            for (node, wp) in curve.nodes().iter().zip(waypoints()) {
                assert_eq!(*node.end(), wp.position);
            }

            let traced: f64 = curve
                .flatten(opts.epsilon())
                .windows(2)
                .map(|w| vec_dist(&w[0], &w[1]))
                .sum();
            assert_relative_eq!(traced, curve.distance(), epsilon = 1e-3);
            assert_relative_eq!(
                road.distance_at_road_percent(f64::INFINITY),
                curve.distance(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_point_at_distance_matches_road_percent() {
        let road = RoadPath::build(&waypoints(), SplineMethod::CatmullRom, &CurveOptions::default())
            .unwrap_or_else(|e| panic!("{e}"));
        let dist = road.distance_at_road_percent(0.5);
        let by_distance = road.path().point_at_distance(dist, 0.001);
        let by_percent = road.point_at_road_percent(0.5);
        match (by_distance, by_percent) {
            (Some(a), Some(b)) => assert!((a - b).norm() < 0.05),
            other => panic!("missing point: {other:?}"),
        }
    }
}
