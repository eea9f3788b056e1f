//! Error types for route assembly.

use road_curves::CurveError;

use crate::RoadId;

/// Errors that can occur while assembling route sections.
///
/// Imperfect lap data is not an error: sections that cannot be welded
/// cleanly fall back to a direct bridge and a warning is logged.
///
/// # Example
///
/// ```
/// use route_sections::RouteError;
///
/// let error = RouteError::MissingRoad(12);
/// assert!(error.to_string().contains("road 12"));
/// assert!(error.is_missing_road());
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum RouteError {
    /// The route has no manifest entries.
    #[error("route manifest is empty")]
    EmptyManifest,

    /// A manifest entry references a road that is not in the road table.
    #[error("road {0} is not in the road table")]
    MissingRoad(RoadId),

    /// A lap route has only leadin entries.
    #[error("route has no lap sections")]
    NoLapSections,

    /// An invalid configuration parameter was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A road curve could not be built.
    #[error("road curve error: {0}")]
    Curve(#[from] CurveError),
}

impl RouteError {
    /// Creates an invalid configuration error with the given message.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Returns `true` if a referenced road is missing.
    #[must_use]
    pub const fn is_missing_road(&self) -> bool {
        matches!(self, Self::MissingRoad(_))
    }

    /// Returns `true` if the error comes from bad road data.
    #[must_use]
    pub fn is_invalid_road_data(&self) -> bool {
        matches!(self, Self::Curve(e) if e.is_invalid_input())
    }
}
