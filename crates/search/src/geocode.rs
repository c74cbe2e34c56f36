//! Geocoding boundary: trait, alias normalization, and the Nominatim
//! client.
//!
//! A geocoder may legitimately resolve nothing; that is `Ok(None)`, never
//! an error. Transport failures are errors, which the search session then
//! degrades into a miss.

use std::future::Future;
use std::pin::Pin;

use geo::Point;
use serde::Deserialize;

use crate::error::{Result, SearchError};

/// Suffix appended to every query to keep results inside the served city.
pub const DEFAULT_CITY_BIAS: &str = "Xalapa, Veracruz";

const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = concat!("urbano/", env!("CARGO_PKG_VERSION"));

/// Local shorthand expanded before geocoding.
const ALIASES: [(&str, &str); 6] = [
    ("caxa", "Central de Autobuses de Xalapa, Veracruz"),
    ("zona uv", "Zona Universitaria, Xalapa, Veracruz"),
    ("uv", "Universidad Veracruzana, Xalapa, Veracruz"),
    ("plaza crystal", "Plaza Crystal, Xalapa, Veracruz"),
    ("usbi", "Campus para la Cultura las Artes y el Deporte"),
    ("cem", "Centro de Alta Especialidad"),
];

/// Expand a known alias, otherwise return the trimmed term unchanged.
pub fn normalize_term(term: &str) -> String {
    let trimmed = term.trim();
    let lookup = trimmed.to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == lookup)
        .map(|(_, expansion)| (*expansion).to_owned())
        .unwrap_or_else(|| trimmed.to_owned())
}

/// A successfully resolved search term.
#[derive(Clone, Debug)]
pub struct Geocoded {
    pub point: Point,
    pub display_name: String,
}

/// Resolves free-text place names to coordinates.
pub trait Geocoder: Send + Sync {
    fn geocode<'a>(
        &'a self,
        term: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Geocoded>>> + Send + 'a>>;
}

// ============================================================================
// Nominatim client
// ============================================================================

/// Geocoder backed by a Nominatim-compatible HTTP endpoint.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    endpoint: String,
    city_bias: Option<String>,
}

impl NominatimGeocoder {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, Some(DEFAULT_CITY_BIAS.to_owned()))
    }

    pub fn with_endpoint(endpoint: impl Into<String>, city_bias: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: endpoint.into(),
            city_bias,
        }
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Nominatim serializes coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
    display_name: String,
}

impl Geocoder for NominatimGeocoder {
    fn geocode<'a>(
        &'a self,
        term: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Geocoded>>> + Send + 'a>> {
        Box::pin(async move {
            let normalized = normalize_term(term);
            let query = match &self.city_bias {
                Some(bias) => format!("{normalized}, {bias}"),
                None => normalized,
            };

            let hits: Vec<NominatimHit> = self
                .client
                .get(&self.endpoint)
                .query(&[("format", "json"), ("q", query.as_str()), ("limit", "1")])
                .send()
                .await
                .map_err(|err| SearchError::Geocoder(err.to_string()))?
                .error_for_status()
                .map_err(|err| SearchError::Geocoder(err.to_string()))?
                .json()
                .await
                .map_err(|err| SearchError::Geocoder(err.to_string()))?;

            let Some(hit) = hits.into_iter().next() else {
                return Ok(None);
            };
            let lat: f64 = hit
                .lat
                .parse()
                .map_err(|_| SearchError::Geocoder(format!("unparseable latitude {:?}", hit.lat)))?;
            let lon: f64 = hit
                .lon
                .parse()
                .map_err(|_| SearchError::Geocoder(format!("unparseable longitude {:?}", hit.lon)))?;

            Ok(Some(Geocoded {
                point: Point::new(lon, lat),
                display_name: hit.display_name,
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_aliases_expand() {
        assert_eq!(
            normalize_term("caxa"),
            "Central de Autobuses de Xalapa, Veracruz"
        );
        assert_eq!(
            normalize_term("  Zona UV "),
            "Zona Universitaria, Xalapa, Veracruz"
        );
    }

    #[test]
    fn unknown_terms_pass_through_trimmed() {
        assert_eq!(normalize_term("  parque juarez "), "parque juarez");
        // A term merely containing an alias is not an alias
        assert_eq!(normalize_term("uv norte"), "uv norte");
    }
}
