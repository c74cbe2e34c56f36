//! Distance calculation and coordinate validation.
//!
//! All distances are haversine great-circle distances in meters. Validation
//! is split from computation so query loops over registry data (validated at
//! import) can skip the per-point checks.

use geo::{Closest, ClosestPoint, HaversineDistance, Line, LineString, Point};

use crate::models::types::{Result, TransitError};

/// Meters per degree of latitude, and of longitude at the equator.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Rejects non-finite and out-of-range coordinates.
///
/// A failure means "cannot compare", not "infinitely far"; callers must not
/// fold it into a distance.
pub fn validate_position(point: Point) -> Result<()> {
    let (lng, lat) = point.x_y();
    if !lng.is_finite() || !lat.is_finite() {
        return Err(TransitError::InvalidGeometry(format!(
            "non-finite coordinate (lng {lng}, lat {lat})"
        )));
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(TransitError::InvalidGeometry(format!(
            "coordinate out of range (lng {lng}, lat {lat})"
        )));
    }
    Ok(())
}

/// Great-circle distance in meters between two points.
///
/// Symmetric, zero for coincident points, finite for all valid inputs.
pub fn distance(a: Point, b: Point) -> Result<f64> {
    validate_position(a)?;
    validate_position(b)?;
    Ok(haversine_meters(a, b))
}

/// Unvalidated haversine distance for hot loops; both points must already
/// have passed [`validate_position`].
pub fn haversine_meters(a: Point, b: Point) -> f64 {
    a.haversine_distance(&b)
}

/// Haversine distance in meters from a point to the closest point of a
/// segment. Zero when the point lies on the segment or a vertex.
pub fn haversine_distance_to_segment(point: Point, segment: Line) -> f64 {
    let carrier = LineString::from(vec![segment.start, segment.end]);
    match carrier.closest_point(&point) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => haversine_meters(point, p),
        Closest::Indeterminate => f64::INFINITY,
    }
}

/// Degrees spanning `meters` at `latitude`, padded for use as a search
/// envelope. Uses the longitude conversion (the wider one away from the
/// equator) so the envelope never undershoots.
pub fn meters_to_envelope_degrees(meters: f64, latitude: f64) -> f64 {
    let shrink = latitude.to_radians().cos().abs().max(0.01);
    meters / (METERS_PER_DEGREE * shrink) * 1.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::Coord;

    #[test]
    fn distance_to_self_is_zero() {
        let p = Point::new(-96.910, 19.540);
        assert_eq!(distance(p, p).unwrap(), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Point::new(-96.910, 19.540);
        let b = Point::new(-96.905, 19.545);
        let ab = distance(a, b).unwrap();
        let ba = distance(b, a).unwrap();
        assert_relative_eq!(ab, ba, max_relative = 1e-12);
    }

    #[test]
    fn one_kilometer_north() {
        // ~1000 m of latitude at any longitude
        let a = Point::new(-96.910, 19.540);
        let b = Point::new(-96.910, 19.540 + 0.008993);
        assert_relative_eq!(distance(a, b).unwrap(), 1000.0, max_relative = 0.01);
    }

    #[test]
    fn rejects_invalid_coordinates() {
        let good = Point::new(-96.910, 19.540);
        assert!(distance(Point::new(f64::NAN, 19.54), good).is_err());
        assert!(distance(Point::new(-96.91, f64::INFINITY), good).is_err());
        assert!(distance(Point::new(-96.91, 91.0), good).is_err());
        assert!(distance(Point::new(-181.0, 19.54), good).is_err());
    }

    #[test]
    fn segment_distance_zero_on_segment() {
        let segment = Line::new(
            Coord { x: -96.910, y: 19.540 },
            Coord { x: -96.900, y: 19.540 },
        );
        let midpoint = Point::new(-96.905, 19.540);
        assert!(haversine_distance_to_segment(midpoint, segment) < 1.0);

        let vertex = Point::new(-96.910, 19.540);
        assert!(haversine_distance_to_segment(vertex, segment) < 1e-6);
    }

    #[test]
    fn segment_distance_perpendicular_offset() {
        let segment = Line::new(
            Coord { x: -96.910, y: 19.540 },
            Coord { x: -96.900, y: 19.540 },
        );
        // ~1000 m north of the segment midpoint
        let off = Point::new(-96.905, 19.540 + 0.008993);
        assert_relative_eq!(
            haversine_distance_to_segment(off, segment),
            1000.0,
            max_relative = 0.01
        );
    }
}
