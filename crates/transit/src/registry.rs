//! Route-stop association registry.
//!
//! All query traffic reads an immutable [`NetworkSnapshot`]; the only write
//! operation is [`Registry::replace`], which swaps the whole snapshot behind
//! a short-lived lock. Readers holding an `Arc` to the previous snapshot
//! keep a consistent view for as long as they need it, so a reload is never
//! observable mid-query.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use geo::Point;
use rstar::RTree;

use crate::identifiers::{RouteIdentifier, StopIdentifier};
use crate::models::traits::TransitNetwork;
use crate::models::types::{ProximityHit, Result, Route, Stop};
use crate::proximity::find_nearest;
use crate::spatial::index::StopNode;
use crate::spatial::queries::{haversine_meters, meters_to_envelope_degrees, validate_position};

/// Display colors assigned to routes cyclically by load order. When more
/// routes are loaded than the palette holds, colors repeat; that is
/// expected, not an error.
pub const PALETTE: [&str; 15] = [
    "#3498db", "#e74c3c", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c", "#d35400", "#c0392b",
    "#16a085", "#27ae60", "#8e44ad", "#f1c40f", "#e67e22", "#7f8c8d", "#34495e",
];

// ============================================================================
// Snapshot
// ============================================================================

/// An immutable, fully indexed view of the loaded network.
///
/// Construction assigns route colors and builds the lookup maps and the
/// spatial index. Callers must only pass stops whose `route_id` references
/// one of the given routes; the importer enforces this for loaded data.
pub struct NetworkSnapshot {
    routes: Vec<Arc<Route>>,
    stops: Vec<Arc<Stop>>,
    route_map: HashMap<RouteIdentifier, Arc<Route>>,
    stop_map: HashMap<StopIdentifier, Arc<Stop>>,
    stops_by_route: HashMap<RouteIdentifier, Vec<Arc<Stop>>>,
    stop_tree: RTree<StopNode>,
}

impl NetworkSnapshot {
    pub fn empty() -> Self {
        Self::from_parts(Vec::new(), Vec::new())
    }

    /// Build a snapshot from loaded routes and stops, both in load order.
    pub fn from_parts(routes: Vec<Route>, stops: Vec<Stop>) -> Self {
        let routes: Vec<Arc<Route>> = routes
            .into_iter()
            .enumerate()
            .map(|(index, mut route)| {
                route.color = Arc::from(PALETTE[index % PALETTE.len()]);
                Arc::new(route)
            })
            .collect();
        let stops: Vec<Arc<Stop>> = stops.into_iter().map(Arc::new).collect();

        let route_map = routes
            .iter()
            .map(|route| (route.id.clone(), route.clone()))
            .collect();
        let stop_map = stops
            .iter()
            .map(|stop| (stop.id.clone(), stop.clone()))
            .collect();

        let mut stops_by_route: HashMap<RouteIdentifier, Vec<Arc<Stop>>> = HashMap::new();
        for stop in &stops {
            stops_by_route
                .entry(stop.route_id.clone())
                .or_default()
                .push(stop.clone());
        }
        for ordered in stops_by_route.values_mut() {
            ordered.sort_by_key(|stop| stop.sequence);
        }

        let stop_tree = RTree::bulk_load(
            stops
                .iter()
                .enumerate()
                .map(|(index, stop)| StopNode::new(stop.clone(), index))
                .collect(),
        );

        Self {
            routes,
            stops,
            route_map,
            stop_map,
            stops_by_route,
            stop_tree,
        }
    }
}

impl TransitNetwork for NetworkSnapshot {
    fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    fn stops(&self) -> &[Arc<Stop>] {
        &self.stops
    }

    fn route(&self, id: &RouteIdentifier) -> Option<&Arc<Route>> {
        self.route_map.get(id)
    }

    fn stop(&self, id: &StopIdentifier) -> Option<&Arc<Stop>> {
        self.stop_map.get(id)
    }

    fn stops_of_route(&self, id: &RouteIdentifier) -> &[Arc<Stop>] {
        self.stops_by_route
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn route_of_stop(&self, id: &StopIdentifier) -> Option<&Arc<Route>> {
        self.stop_map
            .get(id)
            .and_then(|stop| self.route_map.get(&stop.route_id))
    }

    fn color_of(&self, id: &RouteIdentifier) -> Option<&str> {
        self.route_map.get(id).map(|route| route.color.as_ref())
    }

    fn stops_near(&self, point: Point, radius_m: f64) -> Result<Vec<ProximityHit>> {
        validate_position(point)?;
        if !radius_m.is_finite() || radius_m < 0.0 {
            return Ok(Vec::new());
        }

        // Pre-filter in degree space, confirm with the exact distance, then
        // restore load order so results match the linear-scan contract.
        let envelope = meters_to_envelope_degrees(radius_m, point.y());
        let mut hits: Vec<(usize, ProximityHit)> = self
            .stop_tree
            .locate_within_distance([point.x(), point.y()], envelope * envelope)
            .filter_map(|node| {
                let distance_m = haversine_meters(point, node.stop.position);
                (distance_m <= radius_m).then(|| {
                    (
                        node.load_index,
                        ProximityHit {
                            stop: node.stop.clone(),
                            distance_m,
                        },
                    )
                })
            })
            .collect();
        hits.sort_by_key(|(load_index, _)| *load_index);
        Ok(hits.into_iter().map(|(_, hit)| hit).collect())
    }

    fn nearest_stop(&self, point: Point) -> Result<Option<ProximityHit>> {
        find_nearest(point, &self.stops)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Holder of the current snapshot with atomic wholesale replacement.
pub struct Registry {
    current: RwLock<Arc<NetworkSnapshot>>,
}

impl Registry {
    pub fn new(snapshot: NetworkSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn empty() -> Self {
        Self::new(NetworkSnapshot::empty())
    }

    /// The current snapshot. Queries against the returned `Arc` are pure
    /// reads and never observe a concurrent reload.
    pub fn snapshot(&self) -> Arc<NetworkSnapshot> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the entire network in one step.
    pub fn replace(&self, snapshot: NetworkSnapshot) {
        let snapshot = Arc::new(snapshot);
        match self.current.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::empty()
    }
}
