//! # urbano-transit
//!
//! Geospatial proximity and route-matching engine for a city transit map.
//!
//! ## Features
//!
//! - **Distance**: validated haversine great-circle distance
//! - **Geofence**: tolerance-corridor containment around a route's path
//! - **Proximity**: deterministic radius and nearest-stop queries
//! - **Registry**: immutable route/stop snapshots with atomic reload
//! - **Matching**: origin-destination route resolution with textual fallback
//!
//! ## Example
//!
//! ```
//! use urbano_transit::prelude::*;
//! use geo::{Coord, LineString, Point};
//!
//! let route = Route::new(
//!     RouteIdentifier::new("Ruta-01"),
//!     "Ruta 1 Centro",
//!     "Centro - Zona Universitaria",
//!     LineString::from(vec![
//!         Coord { x: -96.9100, y: 19.5400 },
//!         Coord { x: -96.9050, y: 19.5450 },
//!     ]),
//! );
//!
//! let stop = Stop::new(
//!     StopIdentifier::new("14020000"),
//!     route.id.clone(),
//!     0,
//!     Point::new(-96.9100, 19.5400),
//! );
//!
//! let snapshot = NetworkSnapshot::from_parts(vec![route], vec![stop]);
//!
//! // Stops within 500 m of a query point
//! let hits = snapshot
//!     .stops_near(Point::new(-96.9101, 19.5401), 500.0)
//!     .unwrap();
//! assert_eq!(hits.len(), 1);
//! ```

pub mod admin;
pub mod estimator;
pub mod geofence;
pub mod identifiers;
pub mod import;
pub mod matching;
pub mod models;
pub mod proximity;
pub mod registry;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::admin::{validate_placement, StopPlacement};
    pub use crate::estimator::estimate_runtime;
    pub use crate::geofence::is_on_route;
    pub use crate::identifiers::{RouteIdentifier, StopIdentifier};
    pub use crate::import::{import_network, ImportReport, RouteDocument};
    pub use crate::matching::{
        ensure_distinct_endpoints, find_routes_between, match_by_text, OdQuery,
    };
    pub use crate::models::{
        MatchSet, ProximityHit, Result, Route, ServiceFrequency, Stop, TransitError,
        TransitNetwork,
    };
    pub use crate::proximity::{find_nearby, find_nearest};
    pub use crate::registry::{NetworkSnapshot, Registry};
}

pub use prelude::*;
