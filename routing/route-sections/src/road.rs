//! Road tables and the road-curve cache.
//!
//! A world's road table lists every road as a compact waypoint array. Route
//! assembly only needs the curves of the roads a route touches, so
//! [`RoadCurveCache`] builds each road's [`RoadPath`] on first use and keeps
//! it (or the error) for the lifetime of the table.

use std::sync::OnceLock;

use hashbrown::HashMap;
use road_curves::{
    CurveError, CurveOptions, RawWaypoint, RoadPath, SplineMethod, waypoints_from_raw,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{RoadId, RouteError};

/// One road of a world's road table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadRecord {
    /// Road identifier.
    pub id: RoadId,
    /// Waypoints in road order, margins included.
    pub path: Vec<RawWaypoint>,
    /// Curve construction method.
    #[serde(default)]
    pub spline_type: SplineMethod,
    /// Whether the road is a closed loop.
    #[serde(default)]
    pub looped: bool,
    /// Sports allowed on the road.
    #[serde(default)]
    pub sports: Vec<String>,
}

impl RoadRecord {
    /// Build this road's curve.
    ///
    /// `opts` supplies the sampling step and smoothing; looping comes from
    /// the record.
    ///
    /// # Errors
    ///
    /// Returns the [`CurveError`] for malformed waypoints or too short roads.
    pub fn build(&self, opts: &CurveOptions) -> Result<RoadPath, CurveError> {
        let points = waypoints_from_raw(&self.path)?;
        RoadPath::build(&points, self.spline_type, &opts.with_looped(self.looped))
    }
}

/// Read access to the road curves of one world.
pub trait RoadCurves {
    /// The whole-road curve for `road_id`.
    ///
    /// # Errors
    ///
    /// - [`RouteError::MissingRoad`] if the road is unknown.
    /// - [`RouteError::Curve`] if the road's curve cannot be built.
    fn road_path(&self, road_id: RoadId) -> Result<&RoadPath, RouteError>;
}

impl RoadCurves for HashMap<RoadId, RoadPath> {
    fn road_path(&self, road_id: RoadId) -> Result<&RoadPath, RouteError> {
        self.get(&road_id).ok_or(RouteError::MissingRoad(road_id))
    }
}

#[derive(Debug)]
struct CachedRoad {
    record: RoadRecord,
    path: OnceLock<Result<RoadPath, CurveError>>,
}

/// Lazily built road curves for a road table.
///
/// Each road is built at most once, on first request, and can be read from
/// several threads.
///
/// # Example
///
/// ```
/// use route_sections::{RoadCurveCache, RoadCurves, RoadRecord};
///
/// let record: RoadRecord = serde_json::from_str(
///     r#"{"id": 7, "path": [[0, 0], [100, 0], [200, 50], [300, 50]], "splineType": "CatmullRom"}"#,
/// ).unwrap();
/// let cache = RoadCurveCache::new([record]);
///
/// let road = cache.road_path(7).unwrap();
/// assert_eq!(road.road_length(), 4);
/// assert!(cache.road_path(8).is_err());
/// ```
#[derive(Debug)]
pub struct RoadCurveCache {
    roads: HashMap<RoadId, CachedRoad>,
    options: CurveOptions,
}

impl RoadCurveCache {
    /// Create a cache over a road table with default curve options.
    #[must_use]
    pub fn new(records: impl IntoIterator<Item = RoadRecord>) -> Self {
        Self::with_options(records, CurveOptions::default())
    }

    /// Create a cache over a road table with explicit curve options.
    #[must_use]
    pub fn with_options(
        records: impl IntoIterator<Item = RoadRecord>,
        options: CurveOptions,
    ) -> Self {
        let roads = records
            .into_iter()
            .map(|record| {
                (
                    record.id,
                    CachedRoad {
                        record,
                        path: OnceLock::new(),
                    },
                )
            })
            .collect();
        Self { roads, options }
    }

    /// Number of roads in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roads.len()
    }

    /// Returns `true` if the table has no roads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    /// The record for a road.
    #[must_use]
    pub fn record(&self, road_id: RoadId) -> Option<&RoadRecord> {
        self.roads.get(&road_id).map(|r| &r.record)
    }

    /// Whether the road's curve has been built (successfully or not).
    #[must_use]
    pub fn is_built(&self, road_id: RoadId) -> bool {
        self.roads.get(&road_id).is_some_and(|r| r.path.get().is_some())
    }
}

impl RoadCurves for RoadCurveCache {
    fn road_path(&self, road_id: RoadId) -> Result<&RoadPath, RouteError> {
        let cached = self
            .roads
            .get(&road_id)
            .ok_or(RouteError::MissingRoad(road_id))?;
        let built = cached.path.get_or_init(|| {
            let result = cached.record.build(&self.options);
            match &result {
                Ok(path) => debug!(road_id, nodes = path.len(), "Built road curve"),
                Err(e) => debug!(road_id, error = %e, "Failed to build road curve"),
            }
            result
        });
        built.as_ref().map_err(|e| RouteError::Curve(e.clone()))
    }
}
