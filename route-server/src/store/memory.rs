//! Store backed by an in-memory route index.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use super::{StopStore, StoreError};
use crate::domain::{Station, StationCode, StopRecord, TrainId};
use crate::index::RouteIndex;

/// A [`StopStore`] that serves an already-built [`RouteIndex`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    index: Arc<RouteIndex>,
}

impl MemoryStore {
    pub fn new(index: Arc<RouteIndex>) -> Self {
        Self { index }
    }

    /// Build a store directly from records.
    pub fn from_records(records: impl IntoIterator<Item = StopRecord>) -> Self {
        let (index, _) = RouteIndex::from_records(records);
        Self::new(Arc::new(index))
    }

    pub fn index(&self) -> &Arc<RouteIndex> {
        &self.index
    }
}

impl StopStore for MemoryStore {
    fn stops_at_station<'a>(
        &'a self,
        station: &'a StationCode,
    ) -> BoxFuture<'a, Result<Vec<StopRecord>, StoreError>> {
        let stops = self.index.stops_at_station(station);
        async move { Ok(stops) }.boxed()
    }

    fn stops_for_train<'a>(
        &'a self,
        train: &'a TrainId,
    ) -> BoxFuture<'a, Result<Vec<StopRecord>, StoreError>> {
        let stops = self.index.stops_for_train(train).to_vec();
        async move { Ok(stops) }.boxed()
    }

    fn stations(&self) -> BoxFuture<'_, Result<Vec<Station>, StoreError>> {
        let stations = self.index.stations();
        async move { Ok(stations) }.boxed()
    }
}
