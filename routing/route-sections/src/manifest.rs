//! Route manifests: which roads a route rides, in which direction, and over
//! which road-percent range.
//!
//! Manifests arrive as camelCase JSON records from the game's route tables.
//!
//! # Example
//!
//! ```
//! use route_sections::Route;
//!
//! let route: Route = serde_json::from_str(r#"{
//!     "id": 42,
//!     "courseId": 6,
//!     "supportedLaps": true,
//!     "manifest": [
//!         {"roadId": 3, "start": 0.1, "end": 0.9, "leadin": true},
//!         {"roadId": 5, "start": 0.0, "end": 1.0, "checkpoints": [0, 2]}
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(route.manifest.len(), 2);
//! assert!(route.manifest[0].leadin);
//! assert!(!route.manifest[1].reverse);
//! ```

use serde::{Deserialize, Serialize};

use crate::RoadId;

/// One stretch of road ridden by a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Road ridden.
    pub road_id: RoadId,
    /// Ridden against the road's waypoint order.
    #[serde(default)]
    pub reverse: bool,
    /// Road percent of the lower end of the range.
    pub start: f64,
    /// Road percent of the upper end of the range.
    pub end: f64,
    /// Part of the leadin rather than the repeating lap.
    #[serde(default)]
    pub leadin: bool,
    /// Inclusive range of checkpoint indices on this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoints: Option<[u32; 2]>,
}

impl ManifestEntry {
    /// Create a forward, non-leadin entry.
    #[must_use]
    pub fn new(road_id: RoadId, start: f64, end: f64) -> Self {
        Self {
            road_id,
            start,
            end,
            ..Self::default()
        }
    }

    /// Set the direction of travel.
    #[must_use]
    pub const fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Mark the entry as part of the leadin.
    #[must_use]
    pub const fn with_leadin(mut self, leadin: bool) -> Self {
        self.leadin = leadin;
        self
    }

    /// Set the checkpoint range.
    #[must_use]
    pub const fn with_checkpoints(mut self, first: u32, last: u32) -> Self {
        self.checkpoints = Some([first, last]);
        self
    }

    /// Road percent where travel on this entry begins.
    #[must_use]
    pub const fn entry_percent(&self) -> f64 {
        if self.reverse { self.end } else { self.start }
    }

    /// Road percent where travel on this entry ends.
    #[must_use]
    pub const fn exit_percent(&self) -> f64 {
        if self.reverse { self.start } else { self.end }
    }
}

/// A route: an ordered manifest of road stretches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Route identifier.
    pub id: i64,
    /// World the route belongs to.
    pub course_id: i32,
    /// Road stretches in riding order.
    pub manifest: Vec<ManifestEntry>,
    /// Whether the route can be ridden for multiple laps.
    #[serde(default)]
    pub supported_laps: bool,
}

impl Route {
    /// Index of the first entry of the repeating lap.
    #[must_use]
    pub fn lap_start_index(&self) -> Option<usize> {
        self.manifest.iter().position(|m| !m.leadin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_direction() {
        let entry = ManifestEntry::new(1, 0.2, 0.7);
        assert_eq!(entry.entry_percent(), 0.2);
        assert_eq!(entry.exit_percent(), 0.7);

        let entry = entry.with_reverse(true);
        assert_eq!(entry.entry_percent(), 0.7);
        assert_eq!(entry.exit_percent(), 0.2);
    }

    #[test]
    fn test_lap_start_index() {
        let route = Route {
            manifest: vec![
                ManifestEntry::new(1, 0.0, 1.0).with_leadin(true),
                ManifestEntry::new(2, 0.0, 1.0),
            ],
            ..Route::default()
        };
        assert_eq!(route.lap_start_index(), Some(1));
        assert_eq!(Route::default().lap_start_index(), None);
    }
}
