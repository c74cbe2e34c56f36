//! The read-side seam between the registry and query consumers.
//!
//! Everything here operates on an immutable snapshot; implementations must
//! answer queries without observing concurrent reloads.

use std::sync::Arc;

use geo::Point;

use crate::identifiers::{RouteIdentifier, StopIdentifier};
use crate::models::types::{ProximityHit, Result, Route, Stop};

/// Read-only view of a loaded transit network.
pub trait TransitNetwork: Send + Sync {
    // ---- Collections (load order) ----
    fn routes(&self) -> &[Arc<Route>];
    fn stops(&self) -> &[Arc<Stop>];

    // ---- Lookups ----
    fn route(&self, id: &RouteIdentifier) -> Option<&Arc<Route>>;
    fn stop(&self, id: &StopIdentifier) -> Option<&Arc<Stop>>;

    /// Stops of a route ordered by `sequence`; empty for unknown routes.
    fn stops_of_route(&self, id: &RouteIdentifier) -> &[Arc<Stop>];

    fn route_of_stop(&self, id: &StopIdentifier) -> Option<&Arc<Route>>;

    /// Display color assigned to the route at load time.
    fn color_of(&self, id: &RouteIdentifier) -> Option<&str>;

    // ---- Spatial queries ----

    /// All stops within `radius_m` of `point`, in load order.
    fn stops_near(&self, point: Point, radius_m: f64) -> Result<Vec<ProximityHit>>;

    /// The single closest stop, or `None` for an empty network.
    fn nearest_stop(&self, point: Point) -> Result<Option<ProximityHit>>;
}
