//! Curve paths: ordered node lists with tracing and distance measurement.

use std::ops::{Bound, RangeBounds};
use std::sync::OnceLock;

use nalgebra::Point3;

use crate::bezier::{lerp, sampling_epsilon, steps_for_epsilon, vec_dist};
use crate::PathNode;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default parametric step used when sampling Bézier segments.
pub const DEFAULT_EPSILON: f64 = 0.001;

/// What a [`CurvePath::trace`] visitor wants to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceControl {
    /// Keep sampling.
    #[default]
    Continue,
    /// Stop sampling the current node and move on to the next one.
    SkipNode,
    /// Abort the whole trace.
    Stop,
}

/// One sample produced while tracing a path.
#[derive(Debug, Clone, Copy)]
pub struct TraceStep<'a> {
    /// Index of the node the sampled segment starts at.
    pub index: usize,
    /// Node the sampled segment starts at.
    pub origin: &'a PathNode,
    /// Node the sampled segment ends at (`None` for the last node).
    pub next: Option<&'a PathNode>,
    /// Sampled point.
    pub point: Point3<f64>,
    /// Bézier parameter of the sample within the segment (`0` for lines).
    pub step: f64,
}

/// An ordered sequence of path nodes.
///
/// The first node is always a [`PathNode::Move`]. Paths are values: the
/// transformations ([`Self::reversed`], [`Self::slice`]) return new paths,
/// and only an owned accumulator can be grown with [`Self::extend`].
///
/// Segment lengths at the path's own `epsilon` are measured at most once
/// and reused by [`Self::distance`].
///
/// # Example
///
/// ```
/// use road_curves::{CurvePath, PathNode};
/// use nalgebra::Point3;
///
/// let path = CurvePath::new(
///     vec![
///         PathNode::move_to(Point3::new(0.0, 0.0, 0.0)),
///         PathNode::line_to(Point3::new(3.0, 4.0, 0.0)),
///     ],
///     0.001,
/// );
/// assert!((path.distance() - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurvePath {
    nodes: Vec<PathNode>,
    epsilon: f64,
    looped: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    segment_lengths: OnceLock<Vec<f64>>,
}

impl CurvePath {
    /// Create a path from nodes.
    ///
    /// The first node is turned into a move and any later move into a line,
    /// so the result always satisfies the path invariants.
    #[must_use]
    pub fn new(nodes: Vec<PathNode>, epsilon: f64) -> Self {
        let nodes = nodes
            .into_iter()
            .enumerate()
            .map(|(i, node)| match (i, node) {
                (0, node) => node.to_move(),
                (_, PathNode::Move { end }) => PathNode::Line { end },
                (_, node) => node,
            })
            .collect();
        Self {
            nodes,
            epsilon,
            looped: false,
            segment_lengths: OnceLock::new(),
        }
    }

    /// Create an empty path.
    #[must_use]
    pub fn empty(epsilon: f64) -> Self {
        Self::new(Vec::new(), epsilon)
    }

    /// Mark the path as a closed loop.
    #[must_use]
    pub fn with_looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    /// The same nodes with a different sampling step.
    #[must_use]
    pub fn with_epsilon(&self, epsilon: f64) -> Self {
        Self {
            nodes: self.nodes.clone(),
            epsilon,
            looped: self.looped,
            segment_lengths: OnceLock::new(),
        }
    }

    /// The nodes of the path.
    #[must_use]
    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the path has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parametric sampling step.
    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Whether the path was built as a closed loop.
    #[must_use]
    pub const fn looped(&self) -> bool {
        self.looped
    }

    /// First point of the path.
    #[must_use]
    pub fn start(&self) -> Option<&Point3<f64>> {
        self.nodes.first().map(PathNode::end)
    }

    /// Last point of the path.
    #[must_use]
    pub fn end(&self) -> Option<&Point3<f64>> {
        self.nodes.last().map(PathNode::end)
    }

    /// The same path traversed in the opposite direction.
    ///
    /// Cubic control points swap places and move to the mirrored node, so
    /// reversing twice returns the original nodes exactly.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let Some(last) = self.nodes.last() else {
            return self.with_epsilon(self.epsilon);
        };
        let mut nodes = Vec::with_capacity(self.nodes.len());
        nodes.push(last.to_move());
        for pair in self.nodes.windows(2).rev() {
            let (p0, p1) = (&pair[0], &pair[1]);
            nodes.push(match p1 {
                PathNode::Cubic { cp1, cp2, .. } => p0.with_controls(*cp2, *cp1),
                PathNode::Move { .. } | PathNode::Line { .. } => p0.to_line(),
            });
        }
        Self {
            nodes,
            epsilon: self.epsilon,
            looped: self.looped,
            segment_lengths: OnceLock::new(),
        }
    }

    /// A new path holding the nodes in `range` (clamped to the path).
    #[must_use]
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> Self {
        let (start, end) = clamp_range(&range, self.nodes.len());
        Self::new(self.nodes[start..end].to_vec(), self.epsilon).with_looped(self.looped)
    }

    /// Append another path.
    ///
    /// The first node of `other` becomes a straight line from the current
    /// end (or the move of an empty path); the rest are copied as they are.
    pub fn extend(&mut self, other: &Self) {
        let Some(first) = other.nodes.first() else {
            return;
        };
        self.nodes.push(if self.nodes.is_empty() {
            first.to_move()
        } else {
            first.to_line()
        });
        self.nodes.extend_from_slice(&other.nodes[1..]);
        self.segment_lengths = OnceLock::new();
    }

    /// Walk the path, sampling Bézier segments every `epsilon` of their
    /// parameter.
    ///
    /// For a node followed by a cubic node the visitor sees samples at
    /// `step = 0, epsilon, 2·epsilon, ...` (exclusive of `1`); any other node
    /// is visited once with its own end point. The visitor steers the walk
    /// with [`TraceControl`].
    pub fn trace<F>(&self, epsilon: f64, mut visit: F)
    where
        F: FnMut(&TraceStep<'_>) -> TraceControl,
    {
        let epsilon = sampling_epsilon(epsilon);
        for (index, origin) in self.nodes.iter().enumerate() {
            let next = self.nodes.get(index + 1);
            if let Some(curve) = next.and_then(|n| n.bezier_from(origin.end())) {
                let mut step = 0.0;
                while step < 1.0 {
                    let sample = TraceStep {
                        index,
                        origin,
                        next,
                        point: curve.point_at(step),
                        step,
                    };
                    match visit(&sample) {
                        TraceControl::Continue => {}
                        TraceControl::SkipNode => break,
                        TraceControl::Stop => return,
                    }
                    step += epsilon;
                }
            } else {
                let sample = TraceStep {
                    index,
                    origin,
                    next,
                    point: *origin.end(),
                    step: 0.0,
                };
                if visit(&sample) == TraceControl::Stop {
                    return;
                }
            }
        }
    }

    /// Every point visited by [`Self::trace`].
    #[must_use]
    pub fn flatten(&self, epsilon: f64) -> Vec<Point3<f64>> {
        let mut points = Vec::new();
        self.trace(epsilon, |step| {
            points.push(step.point);
            TraceControl::Continue
        });
        points
    }

    /// Length of the segment ending at node `index + 1`, sampled with
    /// `steps` points per Bézier.
    pub(crate) fn segment_length(&self, index: usize, steps: usize) -> f64 {
        let origin = self.nodes[index].end();
        let next = &self.nodes[index + 1];
        match next.bezier_from(origin) {
            Some(curve) => curve.sampled_length(steps),
            None => vec_dist(origin, next.end()),
        }
    }

    /// Per-segment lengths at the path's own epsilon.
    ///
    /// Entry `i` is the length from node `i` to node `i + 1`.
    #[must_use]
    pub fn segment_lengths(&self) -> &[f64] {
        self.segment_lengths.get_or_init(|| {
            let steps = steps_for_epsilon(self.epsilon);
            (0..self.nodes.len().saturating_sub(1))
                .map(|i| self.segment_length(i, steps))
                .collect()
        })
    }

    /// Sum of segment lengths between the first `count` nodes.
    pub(crate) fn leading_distance(&self, count: usize, epsilon: f64) -> f64 {
        let count = count.min(self.nodes.len().saturating_sub(1));
        let steps = steps_for_epsilon(epsilon);
        if steps == steps_for_epsilon(self.epsilon) {
            self.segment_lengths()[..count].iter().sum()
        } else {
            (0..count).map(|i| self.segment_length(i, steps)).sum()
        }
    }

    /// Length of the path at its own epsilon.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance_with(self.epsilon)
    }

    /// Length of the path, sampling Béziers with step `epsilon`.
    ///
    /// `epsilon` is rounded so that a whole number of samples fits each
    /// segment. Cost is proportional to `node count / epsilon` unless the
    /// lengths for the path's own epsilon are already cached.
    #[must_use]
    pub fn distance_with(&self, epsilon: f64) -> f64 {
        self.leading_distance(self.nodes.len(), epsilon)
    }

    /// The point `target` units along the traced path.
    ///
    /// Returns `None` when `target` is negative or beyond the traced length.
    #[must_use]
    pub fn point_at_distance(&self, target: f64, epsilon: f64) -> Option<Point3<f64>> {
        if !(target >= 0.0) {
            return None;
        }
        let mut found = None;
        let mut dist = 0.0;
        let mut prev: Option<Point3<f64>> = None;
        self.trace(epsilon, |step| {
            if let Some(prev_point) = prev {
                let step_dist = vec_dist(&prev_point, &step.point);
                dist += step_dist;
                if dist > target {
                    let overshoot = (dist - target) / step_dist;
                    found = Some(lerp(&step.point, &prev_point, overshoot));
                    return TraceControl::Stop;
                }
            }
            if dist == target {
                found = Some(step.point);
                return TraceControl::Stop;
            }
            prev = Some(step.point);
            TraceControl::Continue
        });
        found
    }
}

impl PartialEq for CurvePath {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.epsilon == other.epsilon && self.looped == other.looped
    }
}

/// Resolve a range against a length, clamping both ends.
pub(crate) fn clamp_range<R: RangeBounds<usize>>(range: &R, len: usize) -> (usize, usize) {
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e.saturating_add(1),
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    };
    let end = end.min(len);
    (start.min(end), end)
}
