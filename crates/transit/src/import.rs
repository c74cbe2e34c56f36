//! Bulk import of route/stop feature collections into a snapshot.
//!
//! The data loader hands over one document per route: a feature collection
//! holding the route's path and another holding its stops, keyed by the
//! route id from the dataset index. Malformed entities are skipped with a
//! warning and counted; they never abort the load.

use geo::{Coord, LineString, Point};
use geojson::{Feature, FeatureCollection, JsonObject, Value};
use tracing::warn;

use crate::identifiers::{RouteIdentifier, StopIdentifier};
use crate::models::types::{Route, ServiceFrequency, Stop};
use crate::registry::NetworkSnapshot;
use crate::spatial::queries::validate_position;

/// One route's worth of loader output.
#[derive(Clone, Debug)]
pub struct RouteDocument {
    /// Route id from the dataset index; overrides any id embedded in the
    /// feature properties.
    pub id: String,
    pub route: FeatureCollection,
    pub stops: FeatureCollection,
}

/// What the importer kept and what it dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportReport {
    pub routes_loaded: usize,
    pub routes_skipped: usize,
    pub stops_loaded: usize,
    pub stops_skipped: usize,
}

/// Build a network snapshot from loader documents.
///
/// Routes with no usable path are dropped along with their stops, so every
/// loaded stop references a loaded route. Stop sequences are unique per
/// route; later duplicates are dropped.
pub fn import_network(documents: Vec<RouteDocument>) -> (NetworkSnapshot, ImportReport) {
    let mut report = ImportReport::default();
    let mut routes = Vec::new();
    let mut stops = Vec::new();

    for document in documents {
        let route_id = RouteIdentifier::new(&document.id);

        let route = match parse_route(&route_id, &document.route) {
            Some(route) => route,
            None => {
                report.routes_skipped += 1;
                report.stops_skipped += document.stops.features.len();
                continue;
            }
        };
        report.routes_loaded += 1;
        routes.push(route);

        let mut seen_sequences = Vec::new();
        for feature in &document.stops.features {
            match parse_stop(&route_id, feature) {
                Some(stop) if seen_sequences.contains(&stop.sequence) => {
                    warn!(
                        route = %route_id,
                        sequence = stop.sequence,
                        "dropping stop with duplicate sequence"
                    );
                    report.stops_skipped += 1;
                }
                Some(stop) => {
                    seen_sequences.push(stop.sequence);
                    report.stops_loaded += 1;
                    stops.push(stop);
                }
                None => report.stops_skipped += 1,
            }
        }
    }

    (NetworkSnapshot::from_parts(routes, stops), report)
}

fn parse_route(id: &RouteIdentifier, collection: &FeatureCollection) -> Option<Route> {
    let feature = match collection.features.first() {
        Some(feature) => feature,
        None => {
            warn!(route = %id, "route document has no features");
            return None;
        }
    };

    let positions = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::LineString(positions)) => positions,
        _ => {
            warn!(route = %id, "route feature is not a LineString");
            return None;
        }
    };
    if positions.len() < 2 {
        warn!(route = %id, points = positions.len(), "route path is degenerate");
        return None;
    }

    let mut coords = Vec::with_capacity(positions.len());
    for position in positions {
        match parse_point(position) {
            Some(point) => coords.push(Coord {
                x: point.x(),
                y: point.y(),
            }),
            None => {
                warn!(route = %id, "route path has an invalid coordinate");
                return None;
            }
        }
    }

    let props = feature.properties.as_ref();
    let mut route = Route::new(
        id.clone(),
        prop_str(props, "name").unwrap_or_else(|| id.as_str().to_owned()),
        prop_str(props, "desc").unwrap_or_default(),
        LineString::from(coords),
    );
    route.notes = prop_str(props, "notes").map(Into::into);
    route.frequency = ServiceFrequency {
        peak_am: prop_u32(props, "peak_am"),
        midday: prop_u32(props, "midday"),
        peak_pm: prop_u32(props, "peak_pm"),
        night: prop_u32(props, "night"),
    };
    Some(route)
}

fn parse_stop(route_id: &RouteIdentifier, feature: &Feature) -> Option<Stop> {
    let position = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Point(position)) => match parse_point(position) {
            Some(point) => point,
            None => {
                warn!(route = %route_id, "dropping stop with invalid coordinates");
                return None;
            }
        },
        _ => {
            warn!(route = %route_id, "dropping stop without point geometry");
            return None;
        }
    };

    let props = feature.properties.as_ref();
    let id = match prop_str(props, "id") {
        Some(id) => StopIdentifier::new(id),
        None => {
            warn!(route = %route_id, "dropping stop without an id");
            return None;
        }
    };
    let sequence = match props.and_then(|p| p.get("sequence")).and_then(|v| v.as_u64()) {
        Some(sequence) => sequence as u32,
        None => {
            warn!(route = %route_id, stop = %id, "dropping stop without a sequence");
            return None;
        }
    };

    let mut stop = Stop::new(id, route_id.clone(), sequence, position);
    stop.dwell_seconds = prop_f64(props, "dwellTime");
    stop.travel_seconds = prop_f64(props, "travelTime");
    Some(stop)
}

/// GeoJSON positions are `[lng, lat]`.
fn parse_point(position: &[f64]) -> Option<Point> {
    if position.len() < 2 {
        return None;
    }
    let point = Point::new(position[0], position[1]);
    validate_position(point).ok().map(|()| point)
}

fn prop_str(props: Option<&JsonObject>, key: &str) -> Option<String> {
    let value = props?.get(key)?;
    if let Some(text) = value.as_str() {
        return Some(text.to_owned());
    }
    value.as_u64().map(|number| number.to_string())
}

fn prop_u32(props: Option<&JsonObject>, key: &str) -> u32 {
    props
        .and_then(|p| p.get(key))
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32
}

fn prop_f64(props: Option<&JsonObject>, key: &str) -> Option<f64> {
    props?.get(key)?.as_f64()
}
