//! Error types for road-curve operations.

use thiserror::Error;

/// Errors that can occur while building or transforming road curves.
///
/// The input variants ([`Self::InsufficientPoints`], [`Self::InvalidTangent`],
/// [`Self::InvalidCoordinates`], [`Self::InvalidRoadLength`]) indicate bad
/// upstream road data and are never repaired silently.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CurveError {
    /// Insufficient points to define the curve.
    #[error("insufficient points: need at least {required}, got {actual}")]
    InsufficientPoints {
        /// Minimum required points.
        required: usize,
        /// Actual number of points provided.
        actual: usize,
    },

    /// A waypoint tangent override does not have three components.
    #[error("invalid tangent on waypoint {index}: expected 3 components, got {components}")]
    InvalidTangent {
        /// Index of the offending waypoint.
        index: usize,
        /// Number of components supplied.
        components: usize,
    },

    /// A waypoint does not have two or three coordinates.
    #[error("invalid waypoint {index}: expected 2 or 3 coordinates, got {components}")]
    InvalidCoordinates {
        /// Index of the offending waypoint.
        index: usize,
        /// Number of coordinates supplied.
        components: usize,
    },

    /// A road path needs at least one inner node between its two margins.
    #[error("invalid road length {0}: must be >= 3")]
    InvalidRoadLength(usize),

    /// Curve options failed validation.
    #[error("invalid curve options: {0}")]
    InvalidOptions(String),

    /// Reversal of a road path that has already been cropped.
    #[error(
        "cannot reverse a sliced road path (offset index {offset_index}, offset percent {offset_percent})"
    )]
    SlicedReversal {
        /// Offset index of the sliced path.
        offset_index: usize,
        /// Offset percent of the sliced path.
        offset_percent: f64,
    },
}

impl CurveError {
    /// Create an insufficient points error.
    #[must_use]
    pub fn insufficient_points(required: usize, actual: usize) -> Self {
        Self::InsufficientPoints { required, actual }
    }

    /// Create an invalid tangent error.
    #[must_use]
    pub fn invalid_tangent(index: usize, components: usize) -> Self {
        Self::InvalidTangent { index, components }
    }

    /// Create an invalid coordinates error.
    #[must_use]
    pub fn invalid_coordinates(index: usize, components: usize) -> Self {
        Self::InvalidCoordinates { index, components }
    }

    /// Create an invalid options error.
    #[must_use]
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions(message.into())
    }

    /// Check if this error was caused by malformed input data.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InsufficientPoints { .. }
                | Self::InvalidTangent { .. }
                | Self::InvalidCoordinates { .. }
                | Self::InvalidRoadLength(_)
        )
    }

    /// Check if this is an insufficient points error.
    #[must_use]
    pub fn is_insufficient_points(&self) -> bool {
        matches!(self, Self::InsufficientPoints { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CurveError::insufficient_points(2, 1);
        assert!(err.to_string().contains("need at least 2"));
        assert!(err.to_string().contains("got 1"));

        let err = CurveError::invalid_tangent(4, 2);
        assert!(err.to_string().contains("waypoint 4"));

        let err = CurveError::InvalidRoadLength(2);
        assert!(err.to_string().contains(">= 3"));

        let err = CurveError::invalid_options("Epsilon 0 must be in (0, 1]");
        assert!(err.to_string().contains("Epsilon 0"));
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn test_error_predicates() {
        assert!(CurveError::insufficient_points(2, 0).is_invalid_input());
        assert!(CurveError::invalid_tangent(0, 1).is_invalid_input());
        assert!(CurveError::invalid_coordinates(0, 5).is_invalid_input());

        let err = CurveError::SlicedReversal {
            offset_index: 2,
            offset_percent: 0.5,
        };
        assert!(!err.is_invalid_input());
        assert!(!err.is_insufficient_points());
    }
}
