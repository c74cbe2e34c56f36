//! R-tree node wrapping a stop for indexed radius queries.
//!
//! The index pre-filters in Euclidean degree space; callers confirm hits
//! with an exact haversine check and restore load order, so indexed queries
//! stay observably identical to a linear scan over the stop list.

use std::sync::Arc;

use rstar::{PointDistance, RTreeObject, AABB};

use crate::models::types::Stop;

#[derive(Clone)]
pub struct StopNode {
    pub stop: Arc<Stop>,
    /// Position of the stop in the registry's load order; used to restore
    /// deterministic result ordering after a tree query.
    pub load_index: usize,
    point: [f64; 2],
}

impl StopNode {
    pub fn new(stop: Arc<Stop>, load_index: usize) -> Self {
        let point = [stop.position.x(), stop.position.y()];
        Self {
            stop,
            load_index,
            point,
        }
    }
}

impl RTreeObject for StopNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StopNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::{RouteIdentifier, StopIdentifier};
    use geo::Point;
    use rstar::RTree;

    fn stop(id: &str, lng: f64, lat: f64) -> Arc<Stop> {
        Arc::new(Stop::new(
            StopIdentifier::new(id),
            RouteIdentifier::new("r1"),
            0,
            Point::new(lng, lat),
        ))
    }

    #[test]
    fn locates_within_envelope() {
        let tree = RTree::bulk_load(vec![
            StopNode::new(stop("near", -96.9100, 19.5400), 0),
            StopNode::new(stop("far", -96.0000, 19.0000), 1),
        ]);

        let hits: Vec<_> = tree
            .locate_within_distance([-96.9101, 19.5401], 0.01 * 0.01)
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].stop.id.as_str(), "near");
    }
}
