//! Cubic Bézier segments and the point helpers shared by the curve code.

use nalgebra::Point3;

use crate::path::DEFAULT_EPSILON;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A cubic Bézier segment defined by 4 control points.
///
/// The segment passes through `p0` and `p3`, and is tangent to `p0p1` at the
/// start and `p2p3` at the end.
///
/// # Equation
///
/// ```text
/// B(t) = (1-t)³P₀ + 3(1-t)²tP₁ + 3(1-t)t²P₂ + t³P₃
/// ```
///
/// # Example
///
/// ```
/// use road_curves::CubicBezier;
/// use nalgebra::Point3;
///
/// let curve = CubicBezier::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 2.0, 0.0),
///     Point3::new(3.0, 2.0, 0.0),
///     Point3::new(4.0, 0.0, 0.0),
/// );
///
/// let end = curve.point_at(1.0);
/// assert!((end.x - 4.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CubicBezier {
    /// Start point.
    pub p0: Point3<f64>,
    /// First control point (affects start tangent).
    pub p1: Point3<f64>,
    /// Second control point (affects end tangent).
    pub p2: Point3<f64>,
    /// End point.
    pub p3: Point3<f64>,
}

impl CubicBezier {
    /// Create a new cubic Bézier segment.
    #[must_use]
    pub const fn new(p0: Point3<f64>, p1: Point3<f64>, p2: Point3<f64>, p3: Point3<f64>) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Get the control points as an array.
    #[must_use]
    pub fn control_points(&self) -> [Point3<f64>; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }

    /// Evaluate the segment at parameter `t`.
    ///
    /// `t` is not clamped; values outside `[0, 1]` extrapolate the cubic.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        let s = 1.0 - t;
        let s2 = s * s;
        let t2 = t * t;

        Point3::from(
            self.p0.coords * (s2 * s)
                + self.p1.coords * (3.0 * s2 * t)
                + self.p2.coords * (3.0 * s * t2)
                + self.p3.coords * (t2 * t),
        )
    }

    /// Split the segment at parameter `t`, returning two cubic segments.
    ///
    /// The left half covers `[0, t]` and the right half `[t, 1]` of the
    /// original, each re-parameterized over `[0, 1]`.
    #[must_use]
    pub fn split(&self, t: f64) -> (Self, Self) {
        // De Casteljau's algorithm
        let p01 = lerp(&self.p0, &self.p1, t);
        let p12 = lerp(&self.p1, &self.p2, t);
        let p23 = lerp(&self.p2, &self.p3, t);

        let p012 = lerp(&p01, &p12, t);
        let p123 = lerp(&p12, &p23, t);

        let p0123 = lerp(&p012, &p123, t);

        let left = Self::new(self.p0, p01, p012, p0123);
        let right = Self::new(p0123, p123, p23, self.p3);

        (left, right)
    }

    /// The same segment traversed from `p3` back to `p0`.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.p3, self.p2, self.p1, self.p0)
    }

    /// Length of the polyline through `steps` uniform samples (plus `p0`).
    ///
    /// Samples are taken at `t = 1/steps, 2/steps, ..., 1`, so the final
    /// sample lands exactly on `p3`.
    #[must_use]
    pub fn sampled_length(&self, steps: usize) -> f64 {
        let steps = steps.max(1);
        let t = 1.0 / steps as f64;
        let mut prev = self.p0;
        let mut length = 0.0;
        for j in (0..steps).rev() {
            let point = self.point_at(1.0 - j as f64 * t);
            length += vec_dist(&prev, &point);
            prev = point;
        }
        length
    }
}

/// Linear interpolation between two points.
///
/// `t = 0` yields `a`, `t = 1` yields `b`.
#[inline]
#[must_use]
pub fn lerp(a: &Point3<f64>, b: &Point3<f64>, t: f64) -> Point3<f64> {
    Point3::from(a.coords * (1.0 - t) + b.coords * t)
}

/// Euclidean distance between two points.
#[inline]
#[must_use]
pub fn vec_dist(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (b - a).norm()
}

/// Smoothing control point for the vertex `b` of the triple `(a, b, c)`.
///
/// The control point lies on the line through `b` parallel to `a -> c`, at
/// `|c - a| * smoothing` from `b`. With `invert` the point is placed on the
/// incoming side instead.
///
/// All three axes move along `c - a`. Renderers that negate the z offset
/// produce different elevation profiles for the same waypoints.
#[inline]
#[must_use]
pub fn bezier_control(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    smoothing: f64,
    invert: bool,
) -> Point3<f64> {
    let sign = if invert { -1.0 } else { 1.0 };
    b + (c - a) * (smoothing * sign)
}

/// The parametric step actually used for sampling: non-positive and NaN
/// steps fall back to [`DEFAULT_EPSILON`].
#[inline]
pub(crate) fn sampling_epsilon(epsilon: f64) -> f64 {
    if epsilon > 0.0 { epsilon } else { DEFAULT_EPSILON }
}

/// Number of uniform Bézier samples for a parametric step of `epsilon`.
///
/// Uses the same fallback as [`CurvePath::trace`](crate::CurvePath::trace),
/// so traced and measured lengths agree. Steps of 1 or more give a single
/// sample.
#[inline]
#[must_use]
pub fn steps_for_epsilon(epsilon: f64) -> usize {
    ((1.0 / sampling_epsilon(epsilon)).round() as usize).max(1)
}
