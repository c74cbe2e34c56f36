//! Core data types for routes, stops, and query results.

use std::sync::Arc;

use geo::{LineString, Point};

use crate::identifiers::{RouteIdentifier, StopIdentifier};

/// Average walking speed used for the "minutes on foot" estimate shown next
/// to a nearby stop, in meters per minute.
pub const WALKING_SPEED_M_PER_MIN: f64 = 83.0;

/// Fallback display color for stops whose route is unknown.
pub const DEFAULT_COLOR: &str = "#f39c12";

// ============================================================================
// Entities
// ============================================================================

/// Scheduled vehicle counts per period of the day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceFrequency {
    pub peak_am: u32,
    pub midday: u32,
    pub peak_pm: u32,
    pub night: u32,
}

/// A named path a vehicle follows, with its display metadata.
///
/// `path` always has at least two coordinates once a route is admitted into a
/// [`NetworkSnapshot`](crate::registry::NetworkSnapshot); `color` is assigned
/// there from the palette, cyclically by load order.
#[derive(Clone, Debug)]
pub struct Route {
    pub id: RouteIdentifier,
    pub name: Arc<str>,
    pub description: Arc<str>,
    pub notes: Option<Arc<str>>,
    pub path: LineString,
    pub color: Arc<str>,
    pub frequency: ServiceFrequency,
}

impl Route {
    pub fn new(
        id: RouteIdentifier,
        name: impl AsRef<str>,
        description: impl AsRef<str>,
        path: LineString,
    ) -> Self {
        Self {
            id,
            name: Arc::from(name.as_ref()),
            description: Arc::from(description.as_ref()),
            notes: None,
            path,
            color: Arc::from(DEFAULT_COLOR),
            frequency: ServiceFrequency::default(),
        }
    }
}

/// A fixed boarding point along a route.
///
/// `sequence` orders the stop within its route; unique per route, not
/// necessarily contiguous. The optional timing fields come from recorded
/// schedule data and feed the runtime estimator.
#[derive(Clone, Debug)]
pub struct Stop {
    pub id: StopIdentifier,
    pub route_id: RouteIdentifier,
    pub sequence: u32,
    pub position: Point,
    pub dwell_seconds: Option<f64>,
    pub travel_seconds: Option<f64>,
}

impl Stop {
    pub fn new(
        id: StopIdentifier,
        route_id: RouteIdentifier,
        sequence: u32,
        position: Point,
    ) -> Self {
        Self {
            id,
            route_id,
            sequence,
            position,
            dwell_seconds: None,
            travel_seconds: None,
        }
    }
}

// ============================================================================
// Query results
// ============================================================================

/// A stop matched by a proximity query, with its distance from the query
/// point in meters.
#[derive(Clone, Debug)]
pub struct ProximityHit {
    pub stop: Arc<Stop>,
    pub distance_m: f64,
}

impl ProximityHit {
    /// Rough walking time from the query point to this stop.
    pub fn walking_minutes(&self) -> u32 {
        (self.distance_m / WALKING_SPEED_M_PER_MIN).round() as u32
    }
}

/// Result of an origin-destination query.
///
/// `direct` holds routes with stops near both endpoints; `fallback` is only
/// populated when `direct` is empty. Both lists are deduplicated and keep
/// first-encounter order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchSet {
    pub direct: Vec<RouteIdentifier>,
    pub fallback: Vec<RouteIdentifier>,
}

impl MatchSet {
    /// True when neither matching stage produced a route: the user-visible
    /// "no connecting route found" outcome.
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.fallback.is_empty()
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    /// Malformed coordinates or a degenerate path. "Cannot compare", never
    /// "infinitely far".
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("route not found: {0}")]
    RouteNotFound(RouteIdentifier),

    /// A proposed stop failed geofence validation; the registry is untouched.
    #[error("stop placement rejected: {0}")]
    PlacementRejected(String),

    /// Origin and destination resolved to (near-)identical points.
    #[error("origin and destination are only {separation_m:.0} m apart (minimum {minimum_m:.0} m)")]
    DegenerateQuery { separation_m: f64, minimum_m: f64 },
}

pub type Result<T> = std::result::Result<T, TransitError>;
