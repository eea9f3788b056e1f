//! Road-mode paths and the road-percent coordinate system.
//!
//! A road is built from `L` waypoints (its *road length*). The first and
//! last are margins that only exist to give the road's ends a tangent:
//! road percent `0` is waypoint 1 and road percent `1` is waypoint `L - 2`.
//! Percents slightly outside `[0, 1]` address the margin segments; anything
//! further out clamps to the first or last node.
//!
//! The game reports positions as *road time*, a fixed-point encoding of the
//! road percent (`percent = (time - 5000) / 1e6`).
//!
//! A [`RoadPath`] can be cut down to a subpath that still answers queries in
//! the parent road's coordinates: it remembers which node of the parent it
//! starts at (`offset_index`), where inside that node it starts
//! (`offset_percent`) and where inside its last node it ends
//! (`crop_percent`). Both fractions are absolute positions inside the
//! parent road's node.

use std::ops::RangeBounds;

use nalgebra::Point3;

use crate::bezier::{lerp, steps_for_epsilon, vec_dist};
use crate::build::construct_nodes;
use crate::path::clamp_range;
use crate::{CurveError, CurveOptions, CurvePath, PathNode, Result, SplineMethod, Waypoint};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Road-time value of road percent `0`.
pub const ROAD_TIME_OFFSET: f64 = 5000.0;

/// Road-time units per whole road.
pub const ROAD_TIME_SCALE: f64 = 1e6;

/// Smallest valid road length: one margin on each side and one waypoint.
pub const MIN_ROAD_LENGTH: usize = 3;

/// Offsets and segment fractions this close to a node snap onto it.
const OFFSET_SNAP: f64 = 1e-9;

/// Convert game road time to road percent.
#[inline]
#[must_use]
pub fn road_time_to_percent(road_time: f64) -> f64 {
    (road_time - ROAD_TIME_OFFSET) / ROAD_TIME_SCALE
}

/// Convert road percent to game road time.
#[inline]
#[must_use]
pub fn road_percent_to_time(road_percent: f64) -> f64 {
    road_percent * ROAD_TIME_SCALE + ROAD_TIME_OFFSET
}

/// Fractional waypoint offset of a road percent.
///
/// ```
/// use road_curves::road_percent_to_offset;
///
/// assert_eq!(road_percent_to_offset(0.0, 6), 1.0);
/// assert_eq!(road_percent_to_offset(1.0, 6), 4.0);
/// ```
#[inline]
#[must_use]
pub fn road_percent_to_offset(road_percent: f64, road_length: usize) -> f64 {
    road_percent * (road_length as f64 - 3.0) + 1.0
}

/// Road percent of a fractional waypoint offset.
///
/// A road of length 3 has a single addressable waypoint, so this yields
/// `-inf`, `NaN` and `+inf` for offsets 0, 1 and 2. Those are results, not
/// errors.
#[inline]
#[must_use]
pub fn road_offset_to_percent(offset: f64, road_length: usize) -> f64 {
    (offset - 1.0) / (road_length as f64 - 3.0)
}

/// Road time of a fractional waypoint offset.
#[inline]
#[must_use]
pub fn road_offset_to_time(offset: f64, road_length: usize) -> f64 {
    road_percent_to_time(road_offset_to_percent(offset, road_length))
}

/// Node index and in-node fraction of a road percent on a whole road.
///
/// Equivalent to [`RoadPath::road_percent_to_offset_tuple`] on an unsliced
/// road of `road_length` nodes.
#[must_use]
pub fn road_percent_to_offset_tuple(road_percent: f64, road_length: usize) -> (usize, f64) {
    OffsetFrame {
        road_length,
        node_count: road_length,
        offset_index: 0,
        offset_percent: 0.0,
        crop_percent: 0.0,
    }
    .tuple(road_percent)
}

/// The part of a road a path covers, in the road's node coordinates.
#[derive(Debug, Clone, Copy)]
struct OffsetFrame {
    road_length: usize,
    node_count: usize,
    offset_index: usize,
    offset_percent: f64,
    crop_percent: f64,
}

impl OffsetFrame {
    /// Absolute in-node fractions covered by local segment `k`.
    fn segment_span(&self, k: usize) -> (f64, f64) {
        let lo = if k == 0 { self.offset_percent } else { 0.0 };
        let hi = if k + 2 == self.node_count && self.crop_percent != 0.0 {
            self.crop_percent
        } else {
            1.0
        };
        (lo, hi)
    }

    /// Absolute in-node fraction of a local fraction of segment `k`.
    fn to_absolute(&self, k: usize, local: f64) -> f64 {
        let (lo, hi) = self.segment_span(k);
        lo + local * (hi - lo)
    }

    fn tuple(&self, road_percent: f64) -> (usize, f64) {
        let n = self.node_count;
        if n == 0 {
            return (0, 0.0);
        }
        // A single inner waypoint is the only addressable point.
        let mut offset = if self.road_length <= MIN_ROAD_LENGTH {
            1.0
        } else {
            road_percent_to_offset(road_percent, self.road_length)
        };
        // Percents derived from node indices land a rounding error off them.
        let nearest = offset.round();
        if (offset - nearest).abs() < OFFSET_SNAP {
            offset = nearest;
        }
        let whole = offset.trunc();
        let fract = offset.fract();
        let fract = if fract.is_nan() { 0.0 } else { fract };

        let rel = whole - self.offset_index as f64;
        if !(rel >= 0.0) {
            return (0, 0.0);
        }
        if rel >= (n - 1) as f64 {
            return (n - 1, 0.0);
        }
        let index = rel as usize;
        let (lo, hi) = self.segment_span(index);
        let local = ((fract - lo) / (hi - lo)).max(0.0);
        if local >= 1.0 - OFFSET_SNAP {
            (index + 1, 0.0)
        } else if local < OFFSET_SNAP {
            (index, 0.0)
        } else {
            (index, local)
        }
    }
}

/// Where a road percent falls on a [`RoadPath`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadBounds {
    /// Index of the node the containing segment starts at.
    pub index: usize,
    /// Fraction through the containing segment.
    pub percent: f64,
    /// Node the containing segment starts at.
    pub origin: PathNode,
    /// Node the containing segment ends at (`None` past the last node).
    pub next: Option<PathNode>,
    /// The located point.
    pub point: Point3<f64>,
}

/// A curve in road mode: one node per road waypoint, margins included.
///
/// Queries take road percents of the *parent road*, even on a subpath.
///
/// # Example
///
/// ```
/// use road_curves::{CurveOptions, RoadPath, SplineMethod, Waypoint};
///
/// let points: Vec<_> = (0..4).map(|i| Waypoint::xy(i as f64, i as f64)).collect();
/// let road = RoadPath::build(&points, SplineMethod::CatmullRom, &CurveOptions::default()).unwrap();
///
/// let mid = road.point_at_road_percent(0.5).unwrap();
/// assert!((mid.x - 1.5).abs() < 1e-9);
///
/// let sub = road.subpath_at_road_percents(0.0, 1.0);
/// assert_eq!(sub.len(), 2);
/// assert_eq!(sub.offset_index(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoadPath {
    path: CurvePath,
    road_length: usize,
    offset_index: usize,
    offset_percent: f64,
    crop_percent: f64,
}

impl RoadPath {
    /// Treat a whole curve as a road (road length = node count).
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidRoadLength`] for fewer than 3 nodes.
    pub fn from_curve(path: CurvePath) -> Result<Self> {
        let road_length = path.len();
        if road_length < MIN_ROAD_LENGTH {
            return Err(CurveError::InvalidRoadLength(road_length));
        }
        Ok(Self {
            path,
            road_length,
            offset_index: 0,
            offset_percent: 0.0,
            crop_percent: 0.0,
        })
    }

    /// Build a road curve through `points`.
    ///
    /// Looped roads keep their padding nodes; they are the margins.
    ///
    /// # Errors
    ///
    /// - [`CurveError::InsufficientPoints`] for fewer than 2 points.
    /// - [`CurveError::InvalidRoadLength`] if the road would have fewer
    ///   than 3 nodes.
    /// - [`CurveError::InvalidOptions`] if `opts` fail validation.
    pub fn build(points: &[Waypoint], method: SplineMethod, opts: &CurveOptions) -> Result<Self> {
        let nodes = construct_nodes(points, method, opts)?;
        Self::from_curve(CurvePath::new(nodes, opts.epsilon()).with_looped(opts.looped()))
    }

    fn frame(&self) -> OffsetFrame {
        OffsetFrame {
            road_length: self.road_length,
            node_count: self.path.len(),
            offset_index: self.offset_index,
            offset_percent: self.offset_percent,
            crop_percent: self.crop_percent,
        }
    }

    fn with_nodes(&self, nodes: Vec<PathNode>) -> CurvePath {
        CurvePath::new(nodes, self.path.epsilon()).with_looped(self.path.looped())
    }

    /// The underlying curve.
    #[must_use]
    pub const fn path(&self) -> &CurvePath {
        &self.path
    }

    /// A plain copy of the underlying curve.
    #[must_use]
    pub fn to_curve_path(&self) -> CurvePath {
        self.path.clone()
    }

    /// The same road with a different sampling step.
    #[must_use]
    pub fn with_epsilon(&self, epsilon: f64) -> Self {
        Self {
            path: self.path.with_epsilon(epsilon),
            ..*self
        }
    }

    /// Nodes of the path.
    #[must_use]
    pub fn nodes(&self) -> &[PathNode] {
        self.path.nodes()
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Returns `true` for an empty subpath.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Number of waypoints of the parent road.
    #[must_use]
    pub const fn road_length(&self) -> usize {
        self.road_length
    }

    /// Parent node index this path starts at.
    #[must_use]
    pub const fn offset_index(&self) -> usize {
        self.offset_index
    }

    /// Absolute fraction through the first node's segment where the path starts.
    #[must_use]
    pub const fn offset_percent(&self) -> f64 {
        self.offset_percent
    }

    /// Absolute fraction through the last segment where the path ends
    /// (`0` when it ends on a node).
    #[must_use]
    pub const fn crop_percent(&self) -> f64 {
        self.crop_percent
    }

    /// Length of the path at its own epsilon.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.path.distance()
    }

    /// Fractional local node offset of a road percent.
    #[must_use]
    pub fn road_percent_to_offset(&self, road_percent: f64) -> f64 {
        let (index, percent) = self.road_percent_to_offset_tuple(road_percent);
        index as f64 + percent
    }

    /// Local node index and fraction through that node's segment.
    ///
    /// Positions before the path map to `(0, 0.0)` and positions after it to
    /// `(len - 1, 0.0)`.
    #[must_use]
    pub fn road_percent_to_offset_tuple(&self, road_percent: f64) -> (usize, f64) {
        self.frame().tuple(road_percent)
    }

    /// Whether the path covers `road_percent` (inclusive at both ends).
    #[must_use]
    pub fn includes_road_percent(&self, road_percent: f64) -> bool {
        let n = self.path.len();
        if n == 0 {
            return false;
        }
        let start = road_offset_to_percent(
            self.offset_index as f64 + self.offset_percent,
            self.road_length,
        );
        let crop_adj = if self.crop_percent != 0.0 {
            1.0 - self.crop_percent
        } else {
            0.0
        };
        let end = road_offset_to_percent(
            (self.offset_index + n - 1) as f64 - crop_adj,
            self.road_length,
        );
        road_percent >= start && road_percent <= end
    }

    /// [`Self::includes_road_percent`] for a road time.
    #[must_use]
    pub fn includes_road_time(&self, road_time: f64) -> bool {
        self.includes_road_percent(road_time_to_percent(road_time))
    }

    /// Locate a road percent on the path.
    ///
    /// The point is evaluated exactly on the containing segment. Returns
    /// `None` only for an empty path.
    #[must_use]
    pub fn bounds_at_road_percent(&self, road_percent: f64) -> Option<RoadBounds> {
        let (index, percent) = self.road_percent_to_offset_tuple(road_percent);
        let origin = *self.path.nodes().get(index)?;
        let next = self.path.nodes().get(index + 1).copied();
        let point = match next {
            Some(next) => match next.bezier_from(origin.end()) {
                Some(curve) => curve.point_at(percent),
                None => lerp(origin.end(), next.end(), percent),
            },
            None => *origin.end(),
        };
        Some(RoadBounds {
            index,
            percent,
            origin,
            next,
            point,
        })
    }

    /// [`Self::bounds_at_road_percent`] for a road time.
    #[must_use]
    pub fn bounds_at_road_time(&self, road_time: f64) -> Option<RoadBounds> {
        self.bounds_at_road_percent(road_time_to_percent(road_time))
    }

    /// The point at a road percent.
    #[must_use]
    pub fn point_at_road_percent(&self, road_percent: f64) -> Option<Point3<f64>> {
        self.bounds_at_road_percent(road_percent).map(|b| b.point)
    }

    /// The point at a road time.
    #[must_use]
    pub fn point_at_road_time(&self, road_time: f64) -> Option<Point3<f64>> {
        self.point_at_road_percent(road_time_to_percent(road_time))
    }

    fn empty_like(&self) -> Self {
        Self {
            path: self.with_nodes(Vec::new()),
            road_length: self.road_length,
            offset_index: 0,
            offset_percent: 0.0,
            crop_percent: 0.0,
        }
    }

    /// The part of the path between two road percents.
    ///
    /// Boundary segments are cut with De Casteljau splits, so the cropped
    /// curve follows the original exactly. `start > end` yields an empty
    /// path; `start == end` a single-node path. Extracting the same range
    /// again from the result returns an identical path.
    #[must_use]
    pub fn subpath_at_road_percents(&self, start: f64, end: f64) -> Self {
        if start > end {
            return self.empty_like();
        }
        let (Some(s), Some(e)) = (
            self.bounds_at_road_percent(start),
            self.bounds_at_road_percent(end),
        ) else {
            return self.empty_like();
        };
        let frame = self.frame();
        let n = self.path.len();

        let mut nodes = vec![PathNode::move_to(s.point)];
        if let Some(inner) = self.path.nodes().get(s.index + 1..=e.index) {
            nodes.extend_from_slice(inner);
        }

        let crop_percent = match e.next {
            Some(next) if e.percent != 0.0 => {
                nodes.push(match next.bezier_from(e.origin.end()) {
                    Some(curve) => {
                        let (left, _) = curve.split(e.percent);
                        PathNode::cubic_to(left.p1, left.p2, left.p3)
                    }
                    None => PathNode::line_to(e.point),
                });
                frame.to_absolute(e.index, e.percent)
            }
            _ if e.index + 1 == n => self.crop_percent,
            _ => 0.0,
        };

        if start == end {
            nodes.truncate(1);
        }

        if nodes.len() > 1 && s.percent != 0.0 {
            if let Some(curve) = s.next.and_then(|next| next.bezier_from(s.origin.end())) {
                let (_, mut head) = curve.split(s.percent);
                if s.index == e.index {
                    let percent = (e.percent - s.percent) / (1.0 - s.percent);
                    head = head.split(percent).0;
                }
                nodes[1] = nodes[1].with_controls(head.p1, head.p2);
            }
        }

        Self {
            path: self.with_nodes(nodes),
            road_length: self.road_length,
            offset_index: s.index + self.offset_index,
            offset_percent: frame.to_absolute(s.index, s.percent),
            crop_percent,
        }
    }

    /// [`Self::subpath_at_road_percents`] for road times.
    #[must_use]
    pub fn subpath_at_road_times(&self, start: f64, end: f64) -> Self {
        self.subpath_at_road_percents(road_time_to_percent(start), road_time_to_percent(end))
    }

    /// The whole road traversed backwards.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::SlicedReversal`] for a path that no longer
    /// starts at the beginning of its road.
    pub fn to_reversed(&self) -> Result<Self> {
        if self.offset_index != 0 || self.offset_percent != 0.0 {
            return Err(CurveError::SlicedReversal {
                offset_index: self.offset_index,
                offset_percent: self.offset_percent,
            });
        }
        Ok(Self {
            path: self.path.reversed(),
            ..*self
        })
    }

    /// The nodes in `range`, keeping road coordinates consistent.
    #[must_use]
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> Self {
        let n = self.path.len();
        let (start, end) = clamp_range(&range, n);
        Self {
            path: self.path.slice(start..end),
            road_length: self.road_length,
            offset_index: self.offset_index + start,
            offset_percent: if start == 0 { self.offset_percent } else { 0.0 },
            crop_percent: if end >= n { self.crop_percent } else { 0.0 },
        }
    }

    /// Distance along the path from its start to a road percent.
    #[must_use]
    pub fn distance_at_road_percent(&self, road_percent: f64) -> f64 {
        self.distance_at_road_percent_with(road_percent, self.path.epsilon())
    }

    /// [`Self::distance_at_road_percent`] with an explicit sampling step.
    ///
    /// Whole segments reuse the path's cached lengths when `epsilon`
    /// matches its own; only the final partial segment is sampled.
    #[must_use]
    pub fn distance_at_road_percent_with(&self, road_percent: f64, epsilon: f64) -> f64 {
        let n = self.path.len();
        let (end_index, end_percent) = self.road_percent_to_offset_tuple(road_percent);
        if n == 0 || (end_index == 0 && end_percent <= 0.0) {
            return 0.0;
        }
        if end_index + 1 >= n {
            return self.path.distance_with(epsilon);
        }
        let mut dist = self.path.leading_distance(end_index, epsilon);
        if end_percent > 0.0 {
            let nodes = self.path.nodes();
            let origin = nodes[end_index].end();
            let next = &nodes[end_index + 1];
            match next.bezier_from(origin) {
                Some(curve) => {
                    let steps = steps_for_epsilon(epsilon);
                    let t = 1.0 / steps as f64;
                    let mut prev = *origin;
                    for j in (0..steps).rev() {
                        let s = end_percent.min(1.0 - j as f64 * t);
                        let point = curve.point_at(s);
                        dist += vec_dist(&prev, &point);
                        prev = point;
                        if s == end_percent {
                            break;
                        }
                    }
                }
                None => dist += vec_dist(origin, next.end()) * end_percent,
            }
        }
        dist
    }
}
