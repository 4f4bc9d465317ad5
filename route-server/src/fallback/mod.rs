//! Fallback route index built from the flat timetable export.
//!
//! Used when the primary store has no candidate trains for a query, for
//! example before the import tool has run. The index is built once and
//! then shared read-only.

mod loader;
mod source;

pub use loader::{FallbackConfig, FallbackLoader};
pub use source::{CsvSource, FlatSource, MemorySource};

use std::time::Duration;

use crate::ingest::IngestError;

/// Errors from loading the fallback index.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read fallback source: {0}")]
    Ingest(#[from] IngestError),

    #[error("fallback load timed out after {0:?}")]
    Timeout(Duration),

    #[error("fallback load task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
