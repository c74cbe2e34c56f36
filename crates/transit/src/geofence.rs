//! Corridor containment around a route's path.
//!
//! A point is "on" a route when it lies within `tolerance_m` of the
//! polyline, i.e. inside the corridor of half-width `tolerance_m` swept
//! along the path. Implemented as a minimum distance-to-segment test, which
//! is equivalent to buffering each segment and testing containment in the
//! union.

use geo::Point;

use crate::models::types::{Result, Route, TransitError};
use crate::spatial::queries::{haversine_distance_to_segment, validate_position};

/// Whether `point` lies within the tolerance corridor around `route.path`.
///
/// Points exactly on a segment or vertex are inside. A path with fewer than
/// two coordinates is degenerate and fails with `InvalidGeometry`, as do an
/// invalid query point or a non-finite/negative tolerance.
pub fn is_on_route(point: Point, route: &Route, tolerance_m: f64) -> Result<bool> {
    validate_position(point)?;

    if !tolerance_m.is_finite() || tolerance_m < 0.0 {
        return Err(TransitError::InvalidGeometry(format!(
            "invalid corridor tolerance {tolerance_m}"
        )));
    }
    if route.path.0.len() < 2 {
        return Err(TransitError::InvalidGeometry(format!(
            "route {} has a degenerate path ({} coordinate(s))",
            route.id,
            route.path.0.len()
        )));
    }

    Ok(route
        .path
        .lines()
        .any(|segment| haversine_distance_to_segment(point, segment) <= tolerance_m))
}
