//! Stop placement validation for the route-editing collaborator.
//!
//! Submitting a drawn stop is an explicit command/result pair: the proposal
//! is validated here and either comes back as a committed [`Stop`] for the
//! next reload, or is rejected without touching any loaded state.

use geo::Point;

use crate::geofence::is_on_route;
use crate::identifiers::{RouteIdentifier, StopIdentifier};
use crate::models::traits::TransitNetwork;
use crate::models::types::{Result, Stop, TransitError};

/// A stop proposed by the editing collaborator, prior to validation.
#[derive(Clone, Debug)]
pub struct StopPlacement {
    pub stop_id: StopIdentifier,
    pub route_id: RouteIdentifier,
    pub sequence: u32,
    pub position: Point,
}

/// Validate a proposed stop against the loaded network.
///
/// The position must lie within the tolerance corridor of the target
/// route's path, and the sequence must be unused on that route. On success
/// the committed stop is returned for inclusion in the next snapshot; on
/// failure nothing is mutated.
pub fn validate_placement(
    placement: &StopPlacement,
    network: &dyn TransitNetwork,
    tolerance_m: f64,
) -> Result<Stop> {
    let route = network
        .route(&placement.route_id)
        .ok_or_else(|| TransitError::RouteNotFound(placement.route_id.clone()))?;

    if network
        .stops_of_route(&placement.route_id)
        .iter()
        .any(|stop| stop.sequence == placement.sequence)
    {
        return Err(TransitError::PlacementRejected(format!(
            "sequence {} is already used on route {}",
            placement.sequence, placement.route_id
        )));
    }

    if !is_on_route(placement.position, route, tolerance_m)? {
        return Err(TransitError::PlacementRejected(format!(
            "stop {} is more than {tolerance_m} m from the path of route {}",
            placement.stop_id, placement.route_id
        )));
    }

    Ok(Stop::new(
        placement.stop_id.clone(),
        placement.route_id.clone(),
        placement.sequence,
        placement.position,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::Route;
    use crate::registry::NetworkSnapshot;
    use geo::{Coord, LineString};

    fn network() -> NetworkSnapshot {
        let route = Route::new(
            RouteIdentifier::new("r1"),
            "Ruta 1",
            "Centro - Estadio",
            LineString::from(vec![
                Coord { x: -96.9100, y: 19.5400 },
                Coord { x: -96.9000, y: 19.5400 },
            ]),
        );
        let existing = Stop::new(
            StopIdentifier::new("s0"),
            RouteIdentifier::new("r1"),
            0,
            Point::new(-96.9100, 19.5400),
        );
        NetworkSnapshot::from_parts(vec![route], vec![existing])
    }

    fn placement(sequence: u32, position: Point) -> StopPlacement {
        StopPlacement {
            stop_id: StopIdentifier::new("s1"),
            route_id: RouteIdentifier::new("r1"),
            sequence,
            position,
        }
    }

    #[test]
    fn accepts_a_stop_on_the_path() {
        let network = network();
        let stop = validate_placement(&placement(1, Point::new(-96.9050, 19.5400)), &network, 20.0)
            .unwrap();
        assert_eq!(stop.id.as_str(), "s1");
        assert_eq!(stop.sequence, 1);
    }

    #[test]
    fn rejects_a_stop_off_the_corridor() {
        let network = network();
        // ~1000 m off the path
        let off = Point::new(-96.9050, 19.5400 + 0.008993);
        let err = validate_placement(&placement(1, off), &network, 20.0).unwrap_err();
        assert!(matches!(err, TransitError::PlacementRejected(_)));
    }

    #[test]
    fn rejects_a_duplicate_sequence() {
        let network = network();
        let err = validate_placement(&placement(0, Point::new(-96.9050, 19.5400)), &network, 20.0)
            .unwrap_err();
        assert!(matches!(err, TransitError::PlacementRejected(_)));
    }

    #[test]
    fn unknown_route_is_reported() {
        let network = network();
        let mut p = placement(1, Point::new(-96.9050, 19.5400));
        p.route_id = RouteIdentifier::new("ghost");
        let err = validate_placement(&p, &network, 20.0).unwrap_err();
        assert!(matches!(err, TransitError::RouteNotFound(_)));
    }

    #[test]
    fn invalid_position_propagates() {
        let network = network();
        let err = validate_placement(&placement(1, Point::new(f64::NAN, 19.54)), &network, 20.0)
            .unwrap_err();
        assert!(matches!(err, TransitError::InvalidGeometry(_)));
    }
}
