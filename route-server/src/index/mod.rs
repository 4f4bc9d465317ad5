//! Route index construction.
//!
//! Groups stop records by train and inverts the grouping by station. The
//! index is derived data: it can be rebuilt from its rows at any time and
//! is shared read-only once built.

mod route_index;

pub use route_index::{BuildReport, RouteIndex};
pub(crate) use route_index::stop_order;
