//! Application state for the web layer.

use std::sync::Arc;

use crate::delay::DelayService;
use crate::search::SearchService;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Route search over the store and fallback index
    pub search: Arc<SearchService>,

    /// Delay prediction
    pub delays: Arc<DelayService>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(search: SearchService, delays: DelayService) -> Self {
        Self {
            search: Arc::new(search),
            delays: Arc::new(delays),
        }
    }
}
