//! Origin-destination route matching with textual fallback.
//!
//! The geometric stage intersects the route sets serving each endpoint.
//! Only when that intersection is empty does the textual stage run: routes
//! matching a search term are kept if they also have a stop near the
//! *other* endpoint, so a name match alone never wins over geography.

use std::sync::Arc;

use geo::Point;

use crate::identifiers::RouteIdentifier;
use crate::models::traits::TransitNetwork;
use crate::models::types::{MatchSet, Result, Route, TransitError};
use crate::proximity::find_nearby;
use crate::spatial::queries::distance;

/// Endpoints closer than this are refused as a degenerate query.
pub const MIN_ENDPOINT_SEPARATION_M: f64 = 50.0;

/// An origin-destination query.
///
/// An endpoint is `None` when geocoding missed for it; the matcher then
/// skips the geometric stage for that side and degrades the textual filter
/// (see [`find_routes_between`]).
#[derive(Clone, Copy, Debug)]
pub struct OdQuery<'a> {
    pub origin: Option<Point>,
    pub destination: Option<Point>,
    pub origin_term: &'a str,
    pub destination_term: &'a str,
    pub radius_m: f64,
}

/// Case-insensitive substring match over route name and description.
///
/// An empty or whitespace-only term matches nothing; no match is a normal,
/// empty result.
pub fn match_by_text(term: &str, routes: &[Arc<Route>]) -> Vec<RouteIdentifier> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    routes
        .iter()
        .filter(|route| {
            route.name.to_lowercase().contains(&needle)
                || route.description.to_lowercase().contains(&needle)
        })
        .map(|route| route.id.clone())
        .collect()
}

/// Caller-side validation: refuse queries whose endpoints resolve to
/// (near-)identical points before the matcher runs.
pub fn ensure_distinct_endpoints(origin: Point, destination: Point) -> Result<()> {
    let separation_m = distance(origin, destination)?;
    if separation_m < MIN_ENDPOINT_SEPARATION_M {
        return Err(TransitError::DegenerateQuery {
            separation_m,
            minimum_m: MIN_ENDPOINT_SEPARATION_M,
        });
    }
    Ok(())
}

/// Resolve the routes connecting two areas.
///
/// Direct matches are routes with at least one stop within `radius_m` of
/// both endpoints. When there are none, textual fallback matches each term
/// against route names/descriptions and keeps routes that also have a stop
/// within `radius_m` of the other endpoint (unfiltered when that endpoint
/// never resolved). An entirely empty [`MatchSet`] is the user-visible "no
/// connecting route found" outcome, not an error.
pub fn find_routes_between(
    query: &OdQuery<'_>,
    network: &dyn TransitNetwork,
) -> Result<MatchSet> {
    let mut matches = MatchSet::default();

    if let (Some(origin), Some(destination)) = (query.origin, query.destination) {
        let near_origin = route_ids_near(network, origin, query.radius_m)?;
        let near_destination = route_ids_near(network, destination, query.radius_m)?;

        for id in near_origin {
            if near_destination.contains(&id) {
                push_unique(&mut matches.direct, id);
            }
        }
        if !matches.direct.is_empty() {
            return Ok(matches);
        }
    }

    for id in match_by_text(query.origin_term, network.routes()) {
        if has_stop_near(network, &id, query.destination, query.radius_m)? {
            push_unique(&mut matches.fallback, id);
        }
    }
    for id in match_by_text(query.destination_term, network.routes()) {
        if has_stop_near(network, &id, query.origin, query.radius_m)? {
            push_unique(&mut matches.fallback, id);
        }
    }

    Ok(matches)
}

/// Route ids with at least one stop within `radius_m` of `point`, in
/// first-encounter (load) order.
fn route_ids_near(
    network: &dyn TransitNetwork,
    point: Point,
    radius_m: f64,
) -> Result<Vec<RouteIdentifier>> {
    let mut ids = Vec::new();
    for hit in network.stops_near(point, radius_m)? {
        push_unique(&mut ids, hit.stop.route_id.clone());
    }
    Ok(ids)
}

/// Whether the route has a stop within `radius_m` of `point`. An
/// unresolved point cannot filter and passes everything through.
fn has_stop_near(
    network: &dyn TransitNetwork,
    id: &RouteIdentifier,
    point: Option<Point>,
    radius_m: f64,
) -> Result<bool> {
    match point {
        Some(point) => {
            let hits = find_nearby(point, radius_m, network.stops_of_route(id))?;
            Ok(!hits.is_empty())
        }
        None => Ok(true),
    }
}

fn push_unique(ids: &mut Vec<RouteIdentifier>, id: RouteIdentifier) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}
