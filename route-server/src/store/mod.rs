//! Primary stop storage.
//!
//! The store is the first place a search looks. It answers the three
//! questions resolution needs (who stops here, what is this train's route,
//! which stations exist) and nothing more. The SQLite implementation backs
//! the server; the in-memory one backs tests and the warm fallback path.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use futures::future::BoxFuture;

use crate::domain::{Station, StationCode, StopRecord, TrainId};

/// Errors from the primary store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row that no longer satisfies the domain invariants.
    #[error("corrupt stop row: {reason}")]
    CorruptRow { reason: String },
}

impl StoreError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        StoreError::CorruptRow {
            reason: reason.into(),
        }
    }
}

/// Read access to stop records.
///
/// Implementations must return `stops_for_train` ordered by sequence
/// number. No ordering is required from `stops_at_station`.
pub trait StopStore: Send + Sync {
    /// Every stop made at `station`, by any train.
    fn stops_at_station<'a>(
        &'a self,
        station: &'a StationCode,
    ) -> BoxFuture<'a, Result<Vec<StopRecord>, StoreError>>;

    /// The full route of `train`, ordered by sequence number. Empty if the
    /// train is unknown.
    fn stops_for_train<'a>(
        &'a self,
        train: &'a TrainId,
    ) -> BoxFuture<'a, Result<Vec<StopRecord>, StoreError>>;

    /// Every distinct station, ordered by code.
    fn stations(&self) -> BoxFuture<'_, Result<Vec<Station>, StoreError>>;
}
