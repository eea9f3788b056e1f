//! Waypoints: the control points curves are built from.
//!
//! Road tables store waypoints as compact arrays (`[x, y]`, `[x, y, z]` or
//! `[x, y, z, {meta}]`). [`RawWaypoint`] mirrors that shape and
//! [`Waypoint::from_raw`] validates it into a typed [`Waypoint`].

use nalgebra::{Point3, Vector3};

use crate::{CurveError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-waypoint construction overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WaypointMeta {
    /// Draw a straight line from this waypoint to the next one.
    pub straight: bool,
    /// Incoming tangent override (Bézier construction only).
    pub tan_in: Option<Vector3<f64>>,
    /// Outgoing tangent override (Bézier construction only).
    pub tan_out: Option<Vector3<f64>>,
}

/// A curve control point with optional construction overrides.
///
/// # Example
///
/// ```
/// use road_curves::Waypoint;
/// use nalgebra::Vector3;
///
/// let wp = Waypoint::xy(1.0, 2.0).with_tan_out(Vector3::new(0.5, 0.0, 0.0));
/// assert_eq!(wp.position.z, 0.0);
/// assert!(wp.meta.tan_out.is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Waypoint {
    /// Position in road coordinates.
    pub position: Point3<f64>,
    /// Construction overrides.
    pub meta: WaypointMeta,
}

impl Waypoint {
    /// Create a waypoint without overrides.
    #[must_use]
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            meta: WaypointMeta::default(),
        }
    }

    /// Create a 2D waypoint (`z = 0`).
    #[must_use]
    pub fn xy(x: f64, y: f64) -> Self {
        Self::new(Point3::new(x, y, 0.0))
    }

    /// Create a 3D waypoint.
    #[must_use]
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Set the straight-line override.
    #[must_use]
    pub const fn with_straight(mut self, straight: bool) -> Self {
        self.meta.straight = straight;
        self
    }

    /// Set the incoming tangent override.
    #[must_use]
    pub const fn with_tan_in(mut self, tangent: Vector3<f64>) -> Self {
        self.meta.tan_in = Some(tangent);
        self
    }

    /// Set the outgoing tangent override.
    #[must_use]
    pub const fn with_tan_out(mut self, tangent: Vector3<f64>) -> Self {
        self.meta.tan_out = Some(tangent);
        self
    }

    /// Validate a raw waypoint record.
    ///
    /// `index` is the record's position in its road and is only used for
    /// error reporting.
    ///
    /// # Errors
    ///
    /// - [`CurveError::InvalidCoordinates`] unless there are 2 or 3
    ///   coordinates.
    /// - [`CurveError::InvalidTangent`] if a tangent override does not have
    ///   exactly 3 components.
    pub fn from_raw(index: usize, raw: &RawWaypoint) -> Result<Self> {
        let position = match raw.coords.as_slice() {
            &[x, y] => Point3::new(x, y, 0.0),
            &[x, y, z] => Point3::new(x, y, z),
            coords => return Err(CurveError::invalid_coordinates(index, coords.len())),
        };
        let meta = match &raw.meta {
            None => WaypointMeta::default(),
            Some(meta) => WaypointMeta {
                straight: meta.straight.unwrap_or(false),
                tan_in: meta
                    .tan_in
                    .as_deref()
                    .map(|t| tangent(index, t))
                    .transpose()?,
                tan_out: meta
                    .tan_out
                    .as_deref()
                    .map(|t| tangent(index, t))
                    .transpose()?,
            },
        };
        Ok(Self { position, meta })
    }
}

fn tangent(index: usize, components: &[f64]) -> Result<Vector3<f64>> {
    match *components {
        [x, y, z] => Ok(Vector3::new(x, y, z)),
        _ => Err(CurveError::invalid_tangent(index, components.len())),
    }
}

/// Validate every waypoint of a road record.
///
/// # Errors
///
/// Returns the first error reported by [`Waypoint::from_raw`].
pub fn waypoints_from_raw(raw: &[RawWaypoint]) -> Result<Vec<Waypoint>> {
    raw.iter()
        .enumerate()
        .map(|(i, wp)| Waypoint::from_raw(i, wp))
        .collect()
}

/// Unvalidated override record as stored in road tables.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct RawWaypointMeta {
    /// Straight-line override.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub straight: Option<bool>,
    /// Incoming tangent, expected to have 3 components.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub tan_in: Option<Vec<f64>>,
    /// Outgoing tangent, expected to have 3 components.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub tan_out: Option<Vec<f64>>,
}

/// Unvalidated waypoint as stored in road tables.
///
/// Serialized as a flat array: the coordinates, followed by the override
/// record when there is one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawWaypoint {
    /// Coordinates, expected to be `[x, y]` or `[x, y, z]`.
    pub coords: Vec<f64>,
    /// Optional overrides.
    pub meta: Option<RawWaypointMeta>,
}

impl RawWaypoint {
    /// Create a raw waypoint without overrides.
    #[must_use]
    pub fn new(coords: Vec<f64>) -> Self {
        Self { coords, meta: None }
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{RawWaypoint, RawWaypointMeta};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        WithMeta(f64, f64, f64, Option<RawWaypointMeta>),
        WithMeta2d(f64, f64, RawWaypointMeta),
        Coords(Vec<f64>),
    }

    impl<'de> Deserialize<'de> for RawWaypoint {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Ok(match Repr::deserialize(deserializer)? {
                Repr::WithMeta(x, y, z, meta) => Self {
                    coords: vec![x, y, z],
                    meta,
                },
                Repr::WithMeta2d(x, y, meta) => Self {
                    coords: vec![x, y],
                    meta: Some(meta),
                },
                Repr::Coords(coords) => Self { coords, meta: None },
            })
        }
    }

    impl Serialize for RawWaypoint {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let len = self.coords.len() + usize::from(self.meta.is_some());
            let mut seq = serializer.serialize_seq(Some(len))?;
            for c in &self.coords {
                seq.serialize_element(c)?;
            }
            if let Some(meta) = &self.meta {
                seq.serialize_element(meta)?;
            }
            seq.end()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_coordinates() {
        let wp = Waypoint::from_raw(0, &RawWaypoint::new(vec![1.0, 2.0]));
        assert_eq!(wp, Ok(Waypoint::xy(1.0, 2.0)));

        let wp = Waypoint::from_raw(0, &RawWaypoint::new(vec![1.0, 2.0, 3.0]));
        assert_eq!(wp, Ok(Waypoint::xyz(1.0, 2.0, 3.0)));

        let err = Waypoint::from_raw(7, &RawWaypoint::new(vec![1.0]));
        assert_eq!(err, Err(CurveError::invalid_coordinates(7, 1)));

        let err = Waypoint::from_raw(0, &RawWaypoint::new(vec![1.0, 2.0, 3.0, 4.0]));
        assert!(err.is_err_and(|e| e.is_invalid_input()));
    }

    #[test]
    fn test_from_raw_meta() {
        let raw = RawWaypoint {
            coords: vec![0.0, 0.0, 0.0],
            meta: Some(RawWaypointMeta {
                straight: Some(true),
                tan_in: Some(vec![1.0, 0.0, 0.0]),
                tan_out: None,
            }),
        };
        let wp = Waypoint::from_raw(0, &raw);
        assert_eq!(
            wp,
            Ok(Waypoint::xyz(0.0, 0.0, 0.0)
                .with_straight(true)
                .with_tan_in(Vector3::x()))
        );
    }

    #[test]
    fn test_from_raw_rejects_short_tangent() {
        let raw = RawWaypoint {
            coords: vec![0.0, 0.0, 0.0],
            meta: Some(RawWaypointMeta {
                tan_out: Some(vec![1.0, 0.0]),
                ..RawWaypointMeta::default()
            }),
        };
        let raws = [RawWaypoint::new(vec![1.0, 1.0]), raw];
        assert_eq!(
            waypoints_from_raw(&raws),
            Err(CurveError::invalid_tangent(1, 2))
        );
    }
}
