//! Resolution against the primary store.
//!
//! Only the candidate trains' routes are fetched, then the same in-memory
//! resolution used for the fallback index runs over them.

use std::collections::BTreeSet;

use futures::future::{try_join, try_join_all};
use tracing::debug;

use crate::domain::TrainId;
use crate::index::RouteIndex;
use crate::store::{StopStore, StoreError};

use super::resolve::{RouteQuery, resolve};
use super::trip::ResolvedTrip;

/// Result of resolving against a store.
#[derive(Debug, Default)]
pub struct StoreResolution {
    /// Trains calling at both ends, in either direction.
    pub candidates: usize,

    pub trips: Vec<ResolvedTrip>,
}

/// Resolve `query` using the rows held in `store`.
pub async fn resolve_from_store(
    store: &dyn StopStore,
    query: &RouteQuery,
) -> Result<StoreResolution, StoreError> {
    if query.is_same_station() {
        return Ok(StoreResolution::default());
    }

    let (at_source, at_destination) = try_join(
        store.stops_at_station(&query.source),
        store.stops_at_station(&query.destination),
    )
    .await?;

    let serving_source: BTreeSet<TrainId> = at_source.into_iter().map(|s| s.train_id).collect();
    let candidates: Vec<TrainId> = at_destination
        .into_iter()
        .map(|s| s.train_id)
        .filter(|t| serving_source.contains(t))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    debug!(
        source = %query.source,
        destination = %query.destination,
        candidates = candidates.len(),
        "store candidates"
    );

    if candidates.is_empty() {
        return Ok(StoreResolution::default());
    }

    let routes = try_join_all(candidates.iter().map(|t| store.stops_for_train(t))).await?;
    let (index, _) = RouteIndex::from_records(routes.into_iter().flatten());

    Ok(StoreResolution {
        candidates: candidates.len(),
        trips: resolve(&index, query),
    })
}
