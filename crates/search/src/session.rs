//! The origin-destination search pipeline.
//!
//! One session serves one search box: every call to [`SearchSession::search`]
//! claims a fresh generation, and any still-running older search notices the
//! newer claim at its next checkpoint and reports itself superseded rather
//! than racing the newer results.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use urbano_transit::matching::{OdQuery, ensure_distinct_endpoints, find_routes_between};
use urbano_transit::models::MatchSet;
use urbano_transit::registry::Registry;

use crate::error::Result;
use crate::geocode::{Geocoded, Geocoder};

/// Proximity radius used when the caller does not pick one, in meters.
pub const DEFAULT_SEARCH_RADIUS_M: f64 = 500.0;

#[derive(Clone, Debug)]
pub struct SearchQuery {
    pub origin_term: String,
    pub destination_term: String,
    pub radius_m: f64,
}

impl SearchQuery {
    pub fn new(origin_term: impl Into<String>, destination_term: impl Into<String>) -> Self {
        Self {
            origin_term: origin_term.into(),
            destination_term: destination_term.into(),
            radius_m: DEFAULT_SEARCH_RADIUS_M,
        }
    }
}

/// Terminal state of one search.
#[derive(Clone, Debug)]
pub enum SearchOutcome {
    /// Routes to present, with whatever endpoints resolved.
    Presented {
        matches: MatchSet,
        origin: Option<Geocoded>,
        destination: Option<Geocoded>,
    },
    /// Both matching stages came up empty: "no connecting route found".
    NoResults,
    /// A newer search started on this session while this one was in flight;
    /// its result must be discarded, not presented.
    Superseded,
}

pub struct SearchSession {
    registry: Arc<Registry>,
    geocoder: Arc<dyn Geocoder>,
    generation: AtomicU64,
}

impl SearchSession {
    pub fn new(registry: Arc<Registry>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            registry,
            geocoder,
            generation: AtomicU64::new(0),
        }
    }

    /// Run one search to a terminal state.
    ///
    /// Pipeline: geocode both endpoints (misses fall through to textual
    /// fallback), refuse degenerate endpoint pairs, then match against the
    /// current registry snapshot.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            generation,
            origin = %query.origin_term,
            destination = %query.destination_term,
            "starting search"
        );

        let origin = self.geocode_endpoint(&query.origin_term).await;
        if self.superseded(generation) {
            return Ok(SearchOutcome::Superseded);
        }
        let destination = self.geocode_endpoint(&query.destination_term).await;
        if self.superseded(generation) {
            return Ok(SearchOutcome::Superseded);
        }

        if let (Some(origin), Some(destination)) = (&origin, &destination) {
            ensure_distinct_endpoints(origin.point, destination.point)?;
        }

        let snapshot = self.registry.snapshot();
        let matches = find_routes_between(
            &OdQuery {
                origin: origin.as_ref().map(|g| g.point),
                destination: destination.as_ref().map(|g| g.point),
                origin_term: query.origin_term.as_str(),
                destination_term: query.destination_term.as_str(),
                radius_m: query.radius_m,
            },
            snapshot.as_ref(),
        )?;

        if matches.is_empty() {
            debug!(generation, "no connecting route found");
            Ok(SearchOutcome::NoResults)
        } else {
            debug!(
                generation,
                direct = matches.direct.len(),
                fallback = matches.fallback.len(),
                "presenting matches"
            );
            Ok(SearchOutcome::Presented {
                matches,
                origin,
                destination,
            })
        }
    }

    fn superseded(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    /// Geocode one endpoint, degrading transport failures into a miss so
    /// the pipeline can still fall back to textual matching.
    async fn geocode_endpoint(&self, term: &str) -> Option<Geocoded> {
        match self.geocoder.geocode(term).await {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(term, error = %err, "geocoding failed, treating as a miss");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;
    use tokio::sync::Notify;

    use geo::{Coord, LineString, Point};
    use urbano_transit::identifiers::{RouteIdentifier, StopIdentifier};
    use urbano_transit::models::{Route, Stop, TransitError};
    use urbano_transit::registry::NetworkSnapshot;

    const ORIGIN: Point = Point(Coord {
        x: -96.9101,
        y: 19.5401,
    });
    const DESTINATION: Point = Point(Coord {
        x: -96.9051,
        y: 19.5451,
    });

    /// r1 serves both endpoints; r2 mentions the bus terminal in its
    /// description and serves only the origin.
    fn registry() -> Arc<Registry> {
        let routes = vec![
            Route::new(
                RouteIdentifier::new("r1"),
                "Ruta 1",
                "Centro - Zona Universitaria",
                LineString::from(vec![
                    Coord { x: -96.92, y: 19.53 },
                    Coord { x: -96.90, y: 19.55 },
                ]),
            ),
            Route::new(
                RouteIdentifier::new("r2"),
                "Ruta 2",
                "CAXA - Estadio",
                LineString::from(vec![
                    Coord { x: -96.92, y: 19.54 },
                    Coord { x: -96.90, y: 19.54 },
                ]),
            ),
        ];
        let stops = vec![
            Stop::new(
                StopIdentifier::new("r1-s0"),
                RouteIdentifier::new("r1"),
                0,
                Point::new(-96.9100, 19.5400),
            ),
            Stop::new(
                StopIdentifier::new("r1-s1"),
                RouteIdentifier::new("r1"),
                1,
                Point::new(-96.9050, 19.5450),
            ),
            Stop::new(
                StopIdentifier::new("r2-s0"),
                RouteIdentifier::new("r2"),
                0,
                Point::new(-96.9105, 19.5405),
            ),
        ];
        Arc::new(Registry::new(NetworkSnapshot::from_parts(routes, stops)))
    }

    struct StubGeocoder {
        answers: HashMap<String, Point>,
    }

    impl StubGeocoder {
        fn new(answers: &[(&str, Point)]) -> Arc<Self> {
            Arc::new(Self {
                answers: answers
                    .iter()
                    .map(|(term, point)| ((*term).to_owned(), *point))
                    .collect(),
            })
        }
    }

    impl Geocoder for StubGeocoder {
        fn geocode<'a>(
            &'a self,
            term: &'a str,
        ) -> Pin<Box<dyn Future<Output = crate::error::Result<Option<Geocoded>>> + Send + 'a>>
        {
            Box::pin(async move {
                Ok(self.answers.get(term).map(|point| Geocoded {
                    point: *point,
                    display_name: term.to_owned(),
                }))
            })
        }
    }

    /// Blocks on `release` for the configured term, so a test can hold one
    /// search in its geocoding phase while another runs to completion.
    struct GatedGeocoder {
        slow_term: String,
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    impl Geocoder for GatedGeocoder {
        fn geocode<'a>(
            &'a self,
            term: &'a str,
        ) -> Pin<Box<dyn Future<Output = crate::error::Result<Option<Geocoded>>> + Send + 'a>>
        {
            Box::pin(async move {
                if term == self.slow_term {
                    self.started.notify_one();
                    self.release.notified().await;
                }
                Ok(None)
            })
        }
    }

    struct BrokenGeocoder;

    impl Geocoder for BrokenGeocoder {
        fn geocode<'a>(
            &'a self,
            _term: &'a str,
        ) -> Pin<Box<dyn Future<Output = crate::error::Result<Option<Geocoded>>> + Send + 'a>>
        {
            Box::pin(async move { Err(SearchError::Geocoder("connection refused".into())) })
        }
    }

    #[tokio::test]
    async fn direct_match_is_presented() {
        let geocoder = StubGeocoder::new(&[("centro", ORIGIN), ("zona uv", DESTINATION)]);
        let session = SearchSession::new(registry(), geocoder);

        let outcome = session
            .search(&SearchQuery::new("centro", "zona uv"))
            .await
            .unwrap();

        match outcome {
            SearchOutcome::Presented {
                matches,
                origin,
                destination,
            } => {
                assert_eq!(matches.direct, vec![RouteIdentifier::new("r1")]);
                assert!(matches.fallback.is_empty());
                assert!(origin.is_some());
                assert!(destination.is_some());
            }
            other => panic!("expected Presented, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn geocoding_miss_falls_back_to_text() {
        // Destination term resolves nowhere but appears in r2's description,
        // and r2 has a stop near the resolved origin.
        let geocoder = StubGeocoder::new(&[("parque juarez", ORIGIN)]);
        let session = SearchSession::new(registry(), geocoder);

        let outcome = session
            .search(&SearchQuery::new("parque juarez", "estadio"))
            .await
            .unwrap();

        match outcome {
            SearchOutcome::Presented { matches, .. } => {
                assert!(matches.direct.is_empty());
                assert_eq!(matches.fallback, vec![RouteIdentifier::new("r2")]);
            }
            other => panic!("expected Presented, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_degrades_to_no_results() {
        let session = SearchSession::new(registry(), Arc::new(BrokenGeocoder));

        let outcome = session
            .search(&SearchQuery::new("nowhere", "also nowhere"))
            .await
            .unwrap();
        assert!(matches!(outcome, SearchOutcome::NoResults));
    }

    #[tokio::test]
    async fn identical_endpoints_are_refused() {
        let geocoder = StubGeocoder::new(&[("a", ORIGIN), ("b", ORIGIN)]);
        let session = SearchSession::new(registry(), geocoder);

        let err = session
            .search(&SearchQuery::new("a", "b"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SearchError::Transit(TransitError::DegenerateQuery { .. })
        ));
    }

    #[tokio::test]
    async fn newer_search_supersedes_an_in_flight_one() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let geocoder = Arc::new(GatedGeocoder {
            slow_term: "slow".to_owned(),
            started: started.clone(),
            release: release.clone(),
        });
        let session = Arc::new(SearchSession::new(registry(), geocoder));

        let first = tokio::spawn({
            let session = session.clone();
            async move { session.search(&SearchQuery::new("slow", "anywhere")).await }
        });

        // Wait for the first search to enter geocoding, run a second search
        // to completion, then let the first one resume.
        started.notified().await;
        let second = session.search(&SearchQuery::new("x", "y")).await.unwrap();
        assert!(matches!(second, SearchOutcome::NoResults));

        release.notify_one();
        let first = first.await.unwrap().unwrap();
        assert!(matches!(first, SearchOutcome::Superseded));
    }
}
