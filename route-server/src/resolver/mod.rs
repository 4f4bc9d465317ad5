//! Route resolution.
//!
//! Given a source and destination station, find every train that calls at
//! both in that order and describe the ride as a [`ResolvedTrip`].

mod from_store;
mod resolve;
mod trip;

pub use from_store::{StoreResolution, resolve_from_store};
pub use resolve::{ResolveError, RouteQuery, candidate_count, resolve, trip_on_route};
pub use trip::ResolvedTrip;
