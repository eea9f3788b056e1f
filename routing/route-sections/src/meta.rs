//! Route metadata: headline distances and checkpoint lookup.

use hashbrown::HashMap;
use road_curves::CurvePath;
use serde::Serialize;

use crate::section::{RoadSection, assemble};
use crate::{RoadCurves, Route, RouteConfig, RouteError, Result};

/// Assembled route with its headline distances (metres).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    /// Sections in riding order, welds last.
    pub sections: Vec<RoadSection>,
    /// Checkpoint index to the index of the section holding it.
    pub checkpoint_sections: HashMap<u32, usize>,
    /// Distance ridden once before the first lap.
    pub leadin_distance: f64,
    /// Distance of one lap, welds excluded.
    pub lap_distance: f64,
    /// Distance from the end of the last lap section back to the lap start.
    pub weld_distance: f64,
    /// The manifest sections stitched into one curve, welds excluded.
    #[serde(skip)]
    pub path: CurvePath,
}

impl RouteMeta {
    /// Section holding a checkpoint.
    #[must_use]
    pub fn checkpoint_section(&self, checkpoint: u32) -> Option<&RoadSection> {
        self.checkpoint_sections
            .get(&checkpoint)
            .and_then(|&i| self.sections.get(i))
    }

    /// Distance of one full lap including the weld back to its start.
    #[must_use]
    pub fn lap_distance_with_weld(&self) -> f64 {
        self.lap_distance + self.weld_distance
    }
}

/// Assemble a route and derive its metadata.
///
/// # Errors
///
/// The errors of [`route_road_sections`](crate::route_road_sections), and
/// [`RouteError::NoLapSections`] for a route made only of leadin.
///
/// # Example
///
/// ```
/// use hashbrown::HashMap;
/// use route_sections::{ManifestEntry, Route, RouteConfig, route_meta};
/// use road_curves::{CurveOptions, RoadPath, SplineMethod, Waypoint};
///
/// let points: Vec<_> = (0..7).map(|i| Waypoint::xy(f64::from(i) * 1000.0, 0.0)).collect();
/// let road = RoadPath::build(&points, SplineMethod::CatmullRom, &CurveOptions::default())?;
/// let roads = HashMap::from([(1_u32, road)]);
///
/// let route = Route {
///     manifest: vec![
///         ManifestEntry::new(1, 0.0, 0.25).with_leadin(true),
///         ManifestEntry::new(1, 0.25, 1.0).with_checkpoints(0, 1),
///     ],
///     ..Route::default()
/// };
/// let meta = route_meta(&route, &roads, &RouteConfig::default())?;
/// assert!((meta.leadin_distance - 10.0).abs() < 1e-6);
/// assert!((meta.lap_distance - 30.0).abs() < 1e-6);
/// assert_eq!(meta.checkpoint_sections[&1], 1);
/// # Ok::<(), route_sections::RouteError>(())
/// ```
pub fn route_meta(
    route: &Route,
    roads: &impl RoadCurves,
    config: &RouteConfig,
) -> Result<RouteMeta> {
    let (sections, path) = assemble(route, roads, config)?;

    let leadin_distance = sections
        .iter()
        .position(|s| !s.leadin() && !s.weld())
        .and_then(|i| i.checked_sub(1))
        .map_or(0.0, |i| {
            let last_leadin = &sections[i];
            last_leadin.block_offset_distance()
                + last_leadin.distance()
                + last_leadin.margin_end_distance()
        });

    let last_normal = sections
        .iter()
        .rfind(|s| !s.weld() && !s.leadin())
        .ok_or(RouteError::NoLapSections)?;
    let lap_distance = last_normal.block_offset_distance() + last_normal.distance();

    let weld_distance = match sections.last() {
        Some(last) if last.weld() => {
            last_normal.margin_end_distance()
                + last.block_offset_distance()
                + last.distance()
                + last.margin_end_distance()
        }
        _ => 0.0,
    };

    let mut checkpoint_sections = HashMap::new();
    for (i, m) in route.manifest.iter().enumerate() {
        if let Some([first, last]) = m.checkpoints {
            for checkpoint in first..=last {
                checkpoint_sections.insert(checkpoint, i);
            }
        }
    }

    Ok(RouteMeta {
        sections,
        checkpoint_sections,
        leadin_distance,
        lap_distance,
        weld_distance,
        path,
    })
}
