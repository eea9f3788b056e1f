//! Route section assembly.
//!
//! Every manifest entry becomes a [`RoadSection`] holding the ridden part of
//! its road and its distances along the route. Sections are stitched onto a
//! running route curve so that the gap between one road's exit and the next
//! road's entry is counted as a margin.
//!
//! Lap routes whose last entry does not join back onto the first lap entry
//! get extra *weld* sections closing the lap.

use road_curves::{CurvePath, PathNode, Point3, RoadPath, vec_dist};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    CENTIMETERS_PER_METER, ManifestEntry, Result, RoadCurves, RoadId, Route, RouteConfig, RouteError,
};

/// Geometry of a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SectionPath {
    /// Part of a road, in road order (reverse sections are not flipped).
    Road(RoadPath),
    /// Straight bridge between two points that do not share a road.
    Bridge(CurvePath),
}

impl SectionPath {
    /// The section's curve.
    #[must_use]
    pub fn curve(&self) -> &CurvePath {
        match self {
            Self::Road(road) => road.path(),
            Self::Bridge(path) => path,
        }
    }

    /// The road-mode path, if the section lies on a road.
    #[must_use]
    pub const fn road(&self) -> Option<&RoadPath> {
        match self {
            Self::Road(road) => Some(road),
            Self::Bridge(_) => None,
        }
    }
}

/// One section of an assembled route.
///
/// Distances are in metres.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadSection {
    course_id: i32,
    road_id: Option<RoadId>,
    reverse: bool,
    leadin: bool,
    weld: bool,
    path: SectionPath,
    distance: f64,
    block_offset_distance: f64,
    margin_start_distance: f64,
    margin_end_distance: f64,
}

impl RoadSection {
    fn from_entry(course_id: i32, entry: &ManifestEntry, path: RoadPath) -> Self {
        Self {
            course_id,
            road_id: Some(entry.road_id),
            reverse: entry.reverse,
            leadin: entry.leadin,
            weld: false,
            path: SectionPath::Road(path),
            distance: 0.0,
            block_offset_distance: 0.0,
            margin_start_distance: 0.0,
            margin_end_distance: 0.0,
        }
    }

    fn new_weld(course_id: i32, road_id: Option<RoadId>, reverse: bool, path: SectionPath) -> Self {
        let distance = path.curve().distance() / CENTIMETERS_PER_METER;
        Self {
            course_id,
            road_id,
            reverse,
            leadin: false,
            weld: true,
            path,
            distance,
            block_offset_distance: 0.0,
            margin_start_distance: 0.0,
            margin_end_distance: 0.0,
        }
    }

    /// World the section belongs to.
    #[must_use]
    pub const fn course_id(&self) -> i32 {
        self.course_id
    }

    /// Road the section lies on; `None` for a bridge weld.
    #[must_use]
    pub const fn road_id(&self) -> Option<RoadId> {
        self.road_id
    }

    /// Ridden against road order.
    #[must_use]
    pub const fn reverse(&self) -> bool {
        self.reverse
    }

    /// Part of the leadin.
    #[must_use]
    pub const fn leadin(&self) -> bool {
        self.leadin
    }

    /// Synthesized to close a lap.
    #[must_use]
    pub const fn weld(&self) -> bool {
        self.weld
    }

    /// The section's geometry.
    #[must_use]
    pub const fn path(&self) -> &SectionPath {
        &self.path
    }

    /// Length of the section.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Distance from the start of the leadin (leadin sections) or of the lap
    /// (all others) to the start of this section.
    #[must_use]
    pub const fn block_offset_distance(&self) -> f64 {
        self.block_offset_distance
    }

    /// Gap between the previous section's exit and this section's entry.
    #[must_use]
    pub const fn margin_start_distance(&self) -> f64 {
        self.margin_start_distance
    }

    /// Gap between this section's exit and the next section's entry.
    #[must_use]
    pub const fn margin_end_distance(&self) -> f64 {
        self.margin_end_distance
    }

    /// Travel start and end points of the section.
    fn travel_ends(&self) -> (Option<Point3<f64>>, Option<Point3<f64>>) {
        let curve = self.path.curve();
        let (first, last) = (curve.start().copied(), curve.end().copied());
        if self.reverse { (last, first) } else { (first, last) }
    }
}

/// Running route curve with its cumulative length (road units).
#[derive(Debug, Clone)]
pub(crate) struct PathAccumulator {
    path: CurvePath,
    distance: f64,
    epsilon: f64,
}

impl PathAccumulator {
    pub(crate) fn new(epsilon: f64) -> Self {
        Self {
            path: CurvePath::empty(epsilon),
            distance: 0.0,
            epsilon,
        }
    }

    pub(crate) const fn distance(&self) -> f64 {
        self.distance
    }

    /// Append `other`, joining it to the current end with a straight line.
    pub(crate) fn extend(&mut self, other: &CurvePath) {
        if let (Some(end), Some(start)) = (self.path.end(), other.start()) {
            self.distance += vec_dist(end, start);
        }
        self.distance += other.distance_with(self.epsilon);
        self.path.extend(other);
    }

    pub(crate) fn into_path(self) -> CurvePath {
        self.path
    }
}

/// Assemble the sections of a route (see [`route_road_sections`]) and the
/// route curve they were stitched into.
pub(crate) fn assemble(
    route: &Route,
    roads: &impl RoadCurves,
    config: &RouteConfig,
) -> Result<(Vec<RoadSection>, CurvePath)> {
    let issues = config.validate();
    if !issues.is_empty() {
        return Err(RouteError::invalid_config(issues.join("; ")));
    }
    let Some(first) = route.manifest.first() else {
        return Err(RouteError::EmptyManifest);
    };
    let epsilon = config.epsilon();

    let mut sections = route
        .manifest
        .iter()
        .map(|m| {
            let road = roads.road_path(m.road_id)?;
            let path = road.subpath_at_road_percents(m.start, m.end).with_epsilon(epsilon);
            Ok(RoadSection::from_entry(route.course_id, m, path))
        })
        .collect::<Result<Vec<_>>>()?;

    let has_leadin = first.leadin;
    let mut leadin: Option<f64> = None;
    let mut full = PathAccumulator::new(epsilon);

    for i in 0..sections.len() {
        let m = &route.manifest[i];
        let dist_to_end_of_last = full.distance() / CENTIMETERS_PER_METER;
        let curve = sections[i].path.curve();
        let len = curve.len();
        if i > 0 {
            let margin = if m.reverse {
                curve.slice(len.saturating_sub(1)..)
            } else {
                curve.slice(..1)
            };
            full.extend(&margin);
        }
        let dist_to_start = full.distance() / CENTIMETERS_PER_METER;
        if m.reverse {
            full.extend(&curve.reversed());
        } else {
            full.extend(curve);
        }
        let dist_to_end = full.distance() / CENTIMETERS_PER_METER;

        let section = &mut sections[i];
        section.margin_start_distance = dist_to_start - dist_to_end_of_last;
        section.distance = dist_to_end - dist_to_start;
        section.block_offset_distance = if leadin.is_none() && has_leadin && !m.leadin {
            leadin = Some(dist_to_start);
            0.0
        } else if m.leadin {
            dist_to_start
        } else {
            dist_to_start - leadin.unwrap_or(0.0)
        };
        if i > 0 {
            sections[i - 1].margin_end_distance = dist_to_start - dist_to_end_of_last;
        }
    }

    if route.supported_laps {
        let welds = lap_welds(route, roads, config, &sections)?;
        sections.extend(welds);
    }

    debug!(
        route_id = route.id,
        sections = sections.len(),
        distance = full.distance() / CENTIMETERS_PER_METER,
        "Assembled route sections"
    );

    Ok((sections, full.into_path()))
}

/// Sections needed to ride from the end of the last manifest entry back to
/// the start of the first lap entry.
fn lap_welds(
    route: &Route,
    roads: &impl RoadCurves,
    config: &RouteConfig,
    sections: &[RoadSection],
) -> Result<Vec<RoadSection>> {
    let lap_start_index = route.lap_start_index().ok_or(RouteError::NoLapSections)?;
    let lap_start = &route.manifest[lap_start_index];
    let (Some(lap_end), Some(last_section)) = (route.manifest.last(), sections.last()) else {
        return Err(RouteError::EmptyManifest);
    };
    let bridge = || {
        let exit = last_section.travel_ends().1;
        let entry = sections[lap_start_index].travel_ends().0;
        let nodes = exit
            .map(PathNode::move_to)
            .into_iter()
            .chain(entry.map(PathNode::line_to))
            .collect();
        let path = CurvePath::new(nodes, config.epsilon());
        RoadSection::new_weld(route.course_id, None, false, SectionPath::Bridge(path))
    };

    if lap_start.road_id != lap_end.road_id || lap_start.reverse != lap_end.reverse {
        warn!(
            route_id = route.id,
            lap_start_road = lap_start.road_id,
            lap_end_road = lap_end.road_id,
            "Unable to weld lap on one road, bridging endpoints"
        );
        return Ok(vec![bridge()]);
    }

    let exit = lap_end.exit_percent();
    let entry = lap_start.entry_percent();
    if (exit - entry).abs() <= config.weld_tolerance() {
        return Ok(Vec::new());
    }

    let road = roads.road_path(lap_start.road_id)?;
    let weld = |start: f64, end: f64| {
        let path = road.subpath_at_road_percents(start, end).with_epsilon(config.epsilon());
        RoadSection::new_weld(
            route.course_id,
            Some(lap_start.road_id),
            lap_start.reverse,
            SectionPath::Road(path),
        )
    };

    let gap = if lap_start.reverse { exit - entry } else { entry - exit };
    if gap > 0.0 {
        debug!(route_id = route.id, exit, entry, "Welding lap");
        return Ok(vec![weld(exit.min(entry), exit.max(entry))]);
    }
    if -gap > config.split_threshold() {
        debug!(route_id = route.id, exit, entry, "Welding lap around road end");
        let (first, mut second) = if lap_start.reverse {
            (weld(0.0, exit), weld(entry, 1.0))
        } else {
            (weld(exit, 1.0), weld(0.0, entry))
        };
        second.block_offset_distance = first.distance;
        return Ok(vec![first, second]);
    }

    warn!(
        route_id = route.id,
        road_id = lap_start.road_id,
        exit,
        entry,
        "Lap overlaps itself, bridging endpoints"
    );
    Ok(vec![bridge()])
}

/// Assemble the sections of a route.
///
/// One section per manifest entry, in manifest order, followed by any lap
/// weld sections when the route supports laps. Section paths are taken at
/// `config.epsilon()`.
///
/// # Errors
///
/// - [`RouteError::InvalidConfig`] for an invalid `config`.
/// - [`RouteError::EmptyManifest`] for a route without entries.
/// - [`RouteError::MissingRoad`] / [`RouteError::Curve`] from `roads`.
/// - [`RouteError::NoLapSections`] for a lap route made only of leadin.
///
/// # Example
///
/// ```
/// use hashbrown::HashMap;
/// use route_sections::{ManifestEntry, Route, RouteConfig, route_road_sections};
/// use road_curves::{CurveOptions, RoadPath, SplineMethod, Waypoint};
///
/// // 10 m between waypoints, 40 m between the margins.
/// let points: Vec<_> = (0..7).map(|i| Waypoint::xy(f64::from(i) * 1000.0, 0.0)).collect();
/// let road = RoadPath::build(&points, SplineMethod::CatmullRom, &CurveOptions::default())?;
/// let roads = HashMap::from([(1_u32, road)]);
///
/// let route = Route {
///     manifest: vec![ManifestEntry::new(1, 0.0, 0.5), ManifestEntry::new(1, 0.5, 1.0)],
///     ..Route::default()
/// };
/// let sections = route_road_sections(&route, &roads, &RouteConfig::default())?;
/// assert_eq!(sections.len(), 2);
/// assert!((sections[0].distance() + sections[1].distance() - 40.0).abs() < 1e-6);
/// # Ok::<(), route_sections::RouteError>(())
/// ```
pub fn route_road_sections(
    route: &Route,
    roads: &impl RoadCurves,
    config: &RouteConfig,
) -> Result<Vec<RoadSection>> {
    assemble(route, roads, config).map(|(sections, _)| sections)
}
