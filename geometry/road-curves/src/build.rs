//! Curve construction from waypoints.
//!
//! Two interchangeable methods turn a waypoint list into a [`CurvePath`]:
//!
//! - [`SplineMethod::CatmullRom`]: uniform (alpha = 0) Catmull-Rom spline,
//!   converted segment by segment to cubic Béziers.
//! - [`SplineMethod::Bezier`]: cubic Béziers whose control points follow the
//!   neighbouring waypoints, scaled by a smoothing factor, with optional
//!   per-waypoint tangent overrides.
//!
//! Both honour the per-waypoint `straight` override.
//!
//! # Example
//!
//! ```
//! use road_curves::{build_curve, CurveOptions, SplineMethod, Waypoint};
//!
//! let points = [Waypoint::xy(0.0, 0.0), Waypoint::xy(1.0, 1.0), Waypoint::xy(2.0, 0.0)];
//! let path = build_curve(&points, SplineMethod::CatmullRom, &CurveOptions::default()).unwrap();
//! assert_eq!(path.len(), 3);
//! ```

use std::borrow::Cow;

use nalgebra::Point3;

use crate::bezier::bezier_control;
use crate::path::DEFAULT_EPSILON;
use crate::{CurveError, CurvePath, PathNode, Result, Waypoint};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default Bézier smoothing factor.
pub const DEFAULT_SMOOTHING: f64 = 0.2;

/// Curve construction method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SplineMethod {
    /// Uniform Catmull-Rom spline.
    #[default]
    CatmullRom,
    /// Smoothed cubic Bézier spline.
    Bezier,
}

/// Options for curve construction.
///
/// # Example
///
/// ```
/// use road_curves::CurveOptions;
///
/// let opts = CurveOptions::default().with_looped(true).with_epsilon(0.01);
/// assert!(opts.looped());
/// assert!(opts.validate().is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurveOptions {
    looped: bool,
    smoothing: f64,
    epsilon: f64,
    include_edges: bool,
}

impl CurveOptions {
    /// Creates options with default settings.
    ///
    /// Defaults:
    /// - Open curve
    /// - Smoothing: 0.2
    /// - Epsilon: 0.001
    /// - Loop padding nodes excluded
    #[must_use]
    pub const fn new() -> Self {
        Self {
            looped: false,
            smoothing: DEFAULT_SMOOTHING,
            epsilon: DEFAULT_EPSILON,
            include_edges: false,
        }
    }

    /// Sets whether the curve is closed.
    #[must_use]
    pub const fn with_looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    /// Sets the Bézier smoothing factor.
    #[must_use]
    pub const fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Sets the sampling step of the resulting path.
    #[must_use]
    pub const fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets whether a looped curve keeps the padding nodes that exist only
    /// to give the seam a tangent.
    #[must_use]
    pub const fn with_include_edges(mut self, include_edges: bool) -> Self {
        self.include_edges = include_edges;
        self
    }

    /// Returns whether the curve is closed.
    #[must_use]
    pub const fn looped(&self) -> bool {
        self.looped
    }

    /// Returns the Bézier smoothing factor.
    #[must_use]
    pub const fn smoothing(&self) -> f64 {
        self.smoothing
    }

    /// Returns the sampling step.
    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns whether loop padding nodes are kept.
    #[must_use]
    pub const fn include_edges(&self) -> bool {
        self.include_edges
    }

    /// Validates the options and returns any issues.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !(self.epsilon > 0.0 && self.epsilon <= 1.0) {
            issues.push(format!("Epsilon {} must be in (0, 1]", self.epsilon));
        }
        if !self.smoothing.is_finite() {
            issues.push(format!("Smoothing {} must be finite", self.smoothing));
        }

        issues
    }
}

impl Default for CurveOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap a closed curve's waypoints: the last point is prepended and the
/// first two are appended, so every real segment has both neighbours.
fn pad_loop(points: &[Waypoint], looped: bool) -> Cow<'_, [Waypoint]> {
    if !looped {
        return Cow::Borrowed(points);
    }
    let mut padded = Vec::with_capacity(points.len() + 3);
    padded.extend(points.last().copied());
    padded.extend_from_slice(points);
    padded.extend(points.iter().take(2).copied());
    Cow::Owned(padded)
}

fn check_len(points: &[Waypoint]) -> Result<()> {
    if points.len() < 2 {
        return Err(CurveError::insufficient_points(2, points.len()));
    }
    Ok(())
}

fn catmull_rom_nodes(points: &[Waypoint]) -> Vec<PathNode> {
    let mut nodes = Vec::with_capacity(points.len());
    nodes.push(PathNode::move_to(points[0].position));
    for i in 0..points.len() - 1 {
        let p0 = &points[i];
        let p1 = &points[i + 1];
        if p0.meta.straight {
            nodes.push(PathNode::line_to(p1.position));
            continue;
        }
        let cp1 = match i.checked_sub(1).map(|j| &points[j]) {
            Some(p_1) => Point3::from(
                (p0.position.coords * 6.0 + p1.position.coords - p_1.position.coords) / 6.0,
            ),
            None => p0.position,
        };
        let cp2 = match points.get(i + 2) {
            Some(p2) => Point3::from(
                (p0.position.coords + p1.position.coords * 6.0 - p2.position.coords) / 6.0,
            ),
            None => p1.position,
        };
        nodes.push(PathNode::cubic_to(cp1, cp2, p1.position));
    }
    nodes
}

fn cubic_bezier_nodes(points: &[Waypoint], smoothing: f64) -> Vec<PathNode> {
    let mut nodes = Vec::with_capacity(points.len());
    nodes.push(PathNode::move_to(points[0].position));
    for i in 0..points.len() - 1 {
        let p0 = &points[i];
        let p1 = &points[i + 1];
        // The first waypoint's straight flag is not honoured.
        if i > 0 && p0.meta.straight {
            nodes.push(PathNode::line_to(p1.position));
            continue;
        }
        let cp1 = match (p0.meta.tan_out, i.checked_sub(1).map(|j| &points[j])) {
            (Some(tan), _) => p0.position + tan,
            (None, Some(p_1)) => {
                bezier_control(&p_1.position, &p0.position, &p1.position, smoothing, false)
            }
            (None, None) => p0.position,
        };
        let cp2 = match (p1.meta.tan_in, points.get(i + 2)) {
            (Some(tan), _) => p1.position + tan,
            (None, Some(p2)) => {
                bezier_control(&p0.position, &p1.position, &p2.position, smoothing, true)
            }
            (None, None) => p1.position,
        };
        nodes.push(PathNode::cubic_to(cp1, cp2, p1.position));
    }
    nodes
}

/// Nodes for `points` including loop padding, one per (padded) waypoint.
pub(crate) fn construct_nodes(
    points: &[Waypoint],
    method: SplineMethod,
    opts: &CurveOptions,
) -> Result<Vec<PathNode>> {
    let issues = opts.validate();
    if !issues.is_empty() {
        return Err(CurveError::invalid_options(issues.join("; ")));
    }
    check_len(points)?;
    let points = pad_loop(points, opts.looped);
    Ok(match method {
        SplineMethod::CatmullRom => catmull_rom_nodes(&points),
        SplineMethod::Bezier => cubic_bezier_nodes(&points, opts.smoothing),
    })
}

fn finish(mut nodes: Vec<PathNode>, opts: &CurveOptions) -> CurvePath {
    if opts.looped && !opts.include_edges {
        nodes.pop();
        nodes.remove(0);
    }
    CurvePath::new(nodes, opts.epsilon).with_looped(opts.looped)
}

/// Build a uniform Catmull-Rom curve through `points`.
///
/// # Errors
///
/// Returns [`CurveError::InsufficientPoints`] for fewer than 2 points and
/// [`CurveError::InvalidOptions`] if `opts` fail [`CurveOptions::validate`].
pub fn catmull_rom_path(points: &[Waypoint], opts: &CurveOptions) -> Result<CurvePath> {
    let nodes = construct_nodes(points, SplineMethod::CatmullRom, opts)?;
    Ok(finish(nodes, opts))
}

/// Build a smoothed cubic Bézier curve through `points`.
///
/// # Errors
///
/// Returns [`CurveError::InsufficientPoints`] for fewer than 2 points and
/// [`CurveError::InvalidOptions`] if `opts` fail [`CurveOptions::validate`].
pub fn cubic_bezier_path(points: &[Waypoint], opts: &CurveOptions) -> Result<CurvePath> {
    let nodes = construct_nodes(points, SplineMethod::Bezier, opts)?;
    Ok(finish(nodes, opts))
}

/// Build a curve through `points` with the given method.
///
/// # Errors
///
/// Returns [`CurveError::InsufficientPoints`] for fewer than 2 points and
/// [`CurveError::InvalidOptions`] if `opts` fail [`CurveOptions::validate`].
pub fn build_curve(
    points: &[Waypoint],
    method: SplineMethod,
    opts: &CurveOptions,
) -> Result<CurvePath> {
    match method {
        SplineMethod::CatmullRom => catmull_rom_path(points, opts),
        SplineMethod::Bezier => cubic_bezier_path(points, opts),
    }
}
