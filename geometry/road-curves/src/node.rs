//! Path nodes: the drawing commands a [`CurvePath`](crate::CurvePath) is made of.

use nalgebra::Point3;

use crate::CubicBezier;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One node of a curve path.
///
/// Every node ends at a point. The segment a node describes runs from the
/// previous node's end to its own end; the first node of a path is always a
/// [`PathNode::Move`] and draws nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "cmd", rename_all = "lowercase"))]
pub enum PathNode {
    /// Start of the path.
    Move {
        /// Start point.
        end: Point3<f64>,
    },
    /// Straight segment from the previous end.
    Line {
        /// End point.
        end: Point3<f64>,
    },
    /// Cubic Bézier segment from the previous end.
    Cubic {
        /// First control point.
        cp1: Point3<f64>,
        /// Second control point.
        cp2: Point3<f64>,
        /// End point.
        end: Point3<f64>,
    },
}

impl PathNode {
    /// Create a move node.
    #[must_use]
    pub const fn move_to(end: Point3<f64>) -> Self {
        Self::Move { end }
    }

    /// Create a line node.
    #[must_use]
    pub const fn line_to(end: Point3<f64>) -> Self {
        Self::Line { end }
    }

    /// Create a cubic node.
    #[must_use]
    pub const fn cubic_to(cp1: Point3<f64>, cp2: Point3<f64>, end: Point3<f64>) -> Self {
        Self::Cubic { cp1, cp2, end }
    }

    /// The point this node ends at.
    #[must_use]
    pub const fn end(&self) -> &Point3<f64> {
        match self {
            Self::Move { end } | Self::Line { end } | Self::Cubic { end, .. } => end,
        }
    }

    /// Control points of a cubic node.
    #[must_use]
    pub const fn controls(&self) -> Option<(&Point3<f64>, &Point3<f64>)> {
        match self {
            Self::Cubic { cp1, cp2, .. } => Some((cp1, cp2)),
            Self::Move { .. } | Self::Line { .. } => None,
        }
    }

    /// Returns `true` for cubic nodes.
    #[must_use]
    pub const fn is_cubic(&self) -> bool {
        matches!(self, Self::Cubic { .. })
    }

    /// Returns `true` for move nodes.
    #[must_use]
    pub const fn is_move(&self) -> bool {
        matches!(self, Self::Move { .. })
    }

    /// The same end point as a move node.
    #[must_use]
    pub const fn to_move(&self) -> Self {
        Self::Move { end: *self.end() }
    }

    /// The same end point as a line node (control points dropped).
    #[must_use]
    pub const fn to_line(&self) -> Self {
        Self::Line { end: *self.end() }
    }

    /// A cubic node ending where this node ends, with new control points.
    #[must_use]
    pub const fn with_controls(&self, cp1: Point3<f64>, cp2: Point3<f64>) -> Self {
        Self::Cubic {
            cp1,
            cp2,
            end: *self.end(),
        }
    }

    /// The segment from `start` to this node as a cubic, if this node is one.
    #[must_use]
    pub fn bezier_from(&self, start: &Point3<f64>) -> Option<CubicBezier> {
        match self {
            Self::Cubic { cp1, cp2, end } => Some(CubicBezier::new(*start, *cp1, *cp2, *end)),
            Self::Move { .. } | Self::Line { .. } => None,
        }
    }
}
