//! # urbano-search
//!
//! Asynchronous origin-destination search orchestration over the
//! `urbano-transit` engine: geocoding with alias normalization, the search
//! state machine, and supersession of stale in-flight searches.
//!
//! A search is a sequential pipeline (geocode origin, geocode destination,
//! run the route matcher, fall back to text matching) that only suspends
//! at the network-bound geocoding calls. Starting a new search on the same
//! session invalidates any still-running one via a generation counter; the
//! stale search reports [`SearchOutcome::Superseded`] instead of
//! overwriting newer results.

pub mod error;
pub mod geocode;
pub mod session;

pub use error::{Result, SearchError};
pub use geocode::{Geocoded, Geocoder, NominatimGeocoder, normalize_term};
pub use session::{DEFAULT_SEARCH_RADIUS_M, SearchOutcome, SearchQuery, SearchSession};
