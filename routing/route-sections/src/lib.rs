//! Route section assembly over road curves.
//!
//! A route is an ordered manifest of road stretches. This crate cuts each
//! stretch out of its road's curve, stitches the pieces into one route, and
//! derives the distances the rest of the system needs:
//!
//! - **Manifests**: [`Route`] and [`ManifestEntry`], parsed from the game's
//!   route records.
//! - **Road tables**: [`RoadRecord`] and [`RoadCurveCache`], which builds each
//!   road's [`RoadPath`](road_curves::RoadPath) once, on first use. The
//!   [`RoadCurves`] trait is the seam between the two.
//! - **Sections**: [`route_road_sections`] computes per-section distances,
//!   margins and leadin offsets, and synthesizes weld sections closing laps.
//! - **Metadata**: [`route_meta`] adds leadin, lap and weld distances and a
//!   checkpoint-to-section index.
//!
//! # Example
//!
//! ```
//! use route_sections::{RoadCurveCache, Route, RouteConfig, route_meta};
//!
//! let roads: Vec<route_sections::RoadRecord> = serde_json::from_str(r#"[
//!     {"id": 1, "path": [[0, 0], [1000, 0], [2000, 0], [3000, 0], [4000, 0], [5000, 0], [6000, 0]]}
//! ]"#).unwrap();
//! let route: Route = serde_json::from_str(r#"{
//!     "id": 1, "courseId": 6,
//!     "manifest": [{"roadId": 1, "start": 0.0, "end": 1.0}]
//! }"#).unwrap();
//!
//! let cache = RoadCurveCache::new(roads);
//! let meta = route_meta(&route, &cache, &RouteConfig::default())?;
//! assert!((meta.lap_distance - 40.0).abs() < 1e-6);
//! # Ok::<(), route_sections::RouteError>(())
//! ```
//!
//! # Units
//!
//! Road coordinates are centimetres; every distance reported by this crate
//! is in metres.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::float_cmp,
    clippy::needless_range_loop,
    clippy::doc_markdown
)]

pub mod config;
pub mod error;
pub mod manifest;
pub mod meta;
pub mod road;
pub mod section;

// Re-export main types at crate root for convenience
pub use config::{LAP_WELD_SPLIT_THRESHOLD, LAP_WELD_TOLERANCE, ROUTE_DIST_EPSILON, RouteConfig};
pub use error::RouteError;
pub use manifest::{ManifestEntry, Route};
pub use meta::{RouteMeta, route_meta};
pub use road::{RoadCurveCache, RoadCurves, RoadRecord};
pub use section::{RoadSection, SectionPath, route_road_sections};

/// Road identifier within a world.
pub type RoadId = u32;

/// Road units per metre.
pub const CENTIMETERS_PER_METER: f64 = 100.0;

/// Result type for route assembly.
pub type Result<T> = std::result::Result<T, RouteError>;
