//! Web layer for the route server.
//!
//! Provides JSON endpoints for searching trains, listing stations and
//! predicting delays.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
