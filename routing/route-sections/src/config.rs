//! Configuration for route assembly.
//!
//! # Example
//!
//! ```
//! use route_sections::RouteConfig;
//!
//! let config = RouteConfig::default()
//!     .with_epsilon(1.0 / 500.0)
//!     .with_split_threshold(0.25);
//! assert!(config.validate().is_empty());
//! ```

use serde::{Deserialize, Serialize};

/// Default sampling step for route distances.
pub const ROUTE_DIST_EPSILON: f64 = 1.0 / 200.0;

/// Road-percent difference below which a lap already joins up.
pub const LAP_WELD_TOLERANCE: f64 = 1e-4;

/// Backwards overlap (in road percent) beyond which a lap is taken to wrap
/// around a looped road rather than overlap itself.
pub const LAP_WELD_SPLIT_THRESHOLD: f64 = 0.3;

/// Configuration for [`route_road_sections`](crate::route_road_sections).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    epsilon: f64,
    weld_tolerance: f64,
    split_threshold: f64,
}

impl RouteConfig {
    /// Creates a configuration with default settings.
    ///
    /// Defaults:
    /// - Epsilon: 1/200
    /// - Weld tolerance: 1e-4
    /// - Split threshold: 0.3
    #[must_use]
    pub const fn new() -> Self {
        Self {
            epsilon: ROUTE_DIST_EPSILON,
            weld_tolerance: LAP_WELD_TOLERANCE,
            split_threshold: LAP_WELD_SPLIT_THRESHOLD,
        }
    }

    /// Sets the sampling step used for section distances.
    #[must_use]
    pub const fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the road-percent tolerance for an already closed lap.
    #[must_use]
    pub const fn with_weld_tolerance(mut self, tolerance: f64) -> Self {
        self.weld_tolerance = tolerance;
        self
    }

    /// Sets the overlap beyond which a lap weld wraps around the road.
    #[must_use]
    pub const fn with_split_threshold(mut self, threshold: f64) -> Self {
        self.split_threshold = threshold;
        self
    }

    /// Returns the sampling step.
    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns the weld tolerance.
    #[must_use]
    pub const fn weld_tolerance(&self) -> f64 {
        self.weld_tolerance
    }

    /// Returns the split threshold.
    #[must_use]
    pub const fn split_threshold(&self) -> f64 {
        self.split_threshold
    }

    /// Validates the configuration and returns any issues.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !(self.epsilon > 0.0 && self.epsilon <= 1.0) {
            issues.push(format!("Epsilon {} must be in (0, 1]", self.epsilon));
        }
        if !(self.weld_tolerance >= 0.0) {
            issues.push(format!(
                "Weld tolerance {} must be non-negative",
                self.weld_tolerance
            ));
        }
        if !(self.split_threshold >= self.weld_tolerance) {
            issues.push(format!(
                "Split threshold {} must be at least the weld tolerance {}",
                self.split_threshold, self.weld_tolerance
            ));
        }

        issues
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self::new()
    }
}
