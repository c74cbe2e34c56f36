//! Radius and nearest-stop queries over a candidate list.
//!
//! Both queries are plain scans in candidate order, which makes results
//! deterministic for a fixed input: callers passing the registry's stop
//! list get hits in load order. Candidate positions are trusted (validated
//! at import); only the query point is checked here.

use std::sync::Arc;

use geo::Point;

use crate::models::types::{ProximityHit, Result, Stop};
use crate::spatial::queries::{haversine_meters, validate_position};

/// All candidates within `radius_m` of `point`, in candidate order.
///
/// A radius of zero keeps only exactly coincident stops. A negative or
/// non-finite radius matches nothing.
pub fn find_nearby(
    point: Point,
    radius_m: f64,
    candidates: &[Arc<Stop>],
) -> Result<Vec<ProximityHit>> {
    validate_position(point)?;
    if !radius_m.is_finite() || radius_m < 0.0 {
        return Ok(Vec::new());
    }

    Ok(candidates
        .iter()
        .filter_map(|stop| {
            let distance_m = haversine_meters(point, stop.position);
            (distance_m <= radius_m).then(|| ProximityHit {
                stop: stop.clone(),
                distance_m,
            })
        })
        .collect())
}

/// The closest candidate to `point`, or `None` when `candidates` is empty.
///
/// Considers every candidate regardless of distance. Ties go to the first
/// candidate in iteration order.
pub fn find_nearest(point: Point, candidates: &[Arc<Stop>]) -> Result<Option<ProximityHit>> {
    validate_position(point)?;

    let mut nearest: Option<ProximityHit> = None;
    for stop in candidates {
        let distance_m = haversine_meters(point, stop.position);
        match &nearest {
            Some(best) if distance_m >= best.distance_m => {}
            _ => {
                nearest = Some(ProximityHit {
                    stop: stop.clone(),
                    distance_m,
                });
            }
        }
    }
    Ok(nearest)
}
