//! Route search across the primary store and the fallback index.
//!
//! The store is asked first. Only when it has no train calling at both
//! stations is the fallback index loaded and consulted. A store that has
//! candidates but none running in the right direction is a definitive
//! "no trains", not a reason to fall back.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{Station, StopRecord, TrainId};
use crate::fallback::{FallbackLoader, LoadError};
use crate::resolver::{ResolveError, ResolvedTrip, RouteQuery, resolve_from_store};
use crate::store::{StopStore, StoreError};

/// Errors from a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    InvalidInput(#[from] ResolveError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("fallback unavailable: {0}")]
    Fallback(#[from] LoadError),
}

/// Which data source answered a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripSource {
    Store,
    Fallback,
}

impl TripSource {
    /// Label used in API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            TripSource::Store => "store",
            TripSource::Fallback => "csv",
        }
    }
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub trips: Vec<ResolvedTrip>,
    pub source: TripSource,
}

/// Searches the primary store, falling back to the flat-source index.
#[derive(Clone)]
pub struct SearchService {
    store: Arc<dyn StopStore>,
    fallback: Arc<FallbackLoader>,
}

impl SearchService {
    pub fn new(store: Arc<dyn StopStore>, fallback: Arc<FallbackLoader>) -> Self {
        Self { store, fallback }
    }

    pub fn fallback(&self) -> &Arc<FallbackLoader> {
        &self.fallback
    }

    /// Find trains from `source` to `destination`.
    pub async fn search(&self, source: &str, destination: &str) -> Result<SearchOutcome, SearchError> {
        let query = RouteQuery::new(source, destination)?;

        if query.is_same_station() {
            return Ok(SearchOutcome {
                trips: Vec::new(),
                source: TripSource::Store,
            });
        }

        let from_store = resolve_from_store(self.store.as_ref(), &query).await?;
        if from_store.candidates > 0 {
            debug!(
                source = %query.source,
                destination = %query.destination,
                trips = from_store.trips.len(),
                "resolved from store"
            );
            return Ok(SearchOutcome {
                trips: from_store.trips,
                source: TripSource::Store,
            });
        }

        info!(
            source = %query.source,
            destination = %query.destination,
            "no store candidates, resolving from fallback index"
        );
        let trips = self.fallback.resolve(&query).await?;

        Ok(SearchOutcome {
            trips,
            source: TripSource::Fallback,
        })
    }

    /// Every known station, for autocomplete. Served from the fallback
    /// index when the store has none.
    pub async fn stations(&self) -> Result<Vec<Station>, SearchError> {
        let stations = self.store.stations().await?;
        if !stations.is_empty() {
            return Ok(stations);
        }

        let index = self.fallback.ensure_loaded().await?;
        Ok(index.stations())
    }

    /// The full route of one train, or `None` if neither source knows it.
    pub async fn train(&self, train: &TrainId) -> Result<Option<Vec<StopRecord>>, SearchError> {
        let stops = self.store.stops_for_train(train).await?;
        if !stops.is_empty() {
            return Ok(Some(stops));
        }

        let index = self.fallback.ensure_loaded().await?;
        Ok(index.route(train).map(|route| route.to_vec()))
    }
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}
