//! Search-side error taxonomy.

use urbano_transit::models::TransitError;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An engine error surfaced through the search pipeline (degenerate
    /// endpoints, invalid caller geometry).
    #[error(transparent)]
    Transit(#[from] TransitError),

    /// Transport-level geocoding failure: HTTP error, malformed body. The
    /// session recovers from these like a miss; they only reach callers of
    /// the geocoder itself.
    #[error("geocoding request failed: {0}")]
    Geocoder(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
