//! Trip resolution against a route index.
//!
//! Resolution is pure and in-memory: intersect the trains calling at the
//! source and destination, then keep the ones that reach the destination
//! after the source. Every backing store feeds this same function, so the
//! validity rules never depend on where the rows came from.

use std::sync::Arc;

use tracing::trace;

use crate::domain::{InvalidStationCode, StationCode, StopRecord};
use crate::index::RouteIndex;

use super::trip::ResolvedTrip;

/// Error from route resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Source or destination missing or not a station code
    #[error("invalid {field} station: {reason}")]
    InvalidInput {
        field: &'static str,
        #[source]
        reason: InvalidStationCode,
    },
}

/// A validated (source, destination) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteQuery {
    pub source: StationCode,
    pub destination: StationCode,
}

impl RouteQuery {
    /// Normalize and validate raw station inputs.
    ///
    /// Blank input is rejected rather than resolved to an empty result.
    pub fn new(source: &str, destination: &str) -> Result<Self, ResolveError> {
        let source = StationCode::parse(source).map_err(|reason| ResolveError::InvalidInput {
            field: "source",
            reason,
        })?;
        let destination =
            StationCode::parse(destination).map_err(|reason| ResolveError::InvalidInput {
                field: "destination",
                reason,
            })?;

        Ok(Self {
            source,
            destination,
        })
    }

    /// Whether both ends are the same station. Such a query has no trips.
    pub fn is_same_station(&self) -> bool {
        self.source == self.destination
    }
}

/// Find every train that can carry a passenger from `query.source` to
/// `query.destination`.
///
/// Results are ordered by train number, so repeated calls against the same
/// index return the same sequence.
pub fn resolve(index: &RouteIndex, query: &RouteQuery) -> Vec<ResolvedTrip> {
    if query.is_same_station() {
        return Vec::new();
    }

    let (Some(at_source), Some(at_destination)) = (
        index.trains_at(&query.source),
        index.trains_at(&query.destination),
    ) else {
        return Vec::new();
    };

    at_source
        .intersection(at_destination)
        .filter_map(|train| index.route(train))
        .filter_map(|route| trip_on_route(route, query))
        .collect()
}

/// Number of trains calling at both ends of the query, before any
/// direction check.
pub fn candidate_count(index: &RouteIndex, query: &RouteQuery) -> usize {
    match (
        index.trains_at(&query.source),
        index.trains_at(&query.destination),
    ) {
        (Some(a), Some(b)) => a.intersection(b).count(),
        _ => 0,
    }
}

/// Build the trip for one candidate train, if it is valid.
///
/// `route` must be ordered by sequence number. If a station appears more
/// than once, the earliest visit is used.
pub fn trip_on_route(route: &Arc<[StopRecord]>, query: &RouteQuery) -> Option<ResolvedTrip> {
    let source_stop = route.iter().find(|s| s.station_code == query.source)?;
    let destination_stop = route.iter().find(|s| s.station_code == query.destination)?;

    if source_stop.sequence_no >= destination_stop.sequence_no {
        trace!(
            train = %source_stop.train_id,
            "discarding candidate: destination not after source"
        );
        return None;
    }

    let distance_km = destination_stop.distance_km - source_stop.distance_km;
    if !(distance_km > 0.0) {
        trace!(
            train = %source_stop.train_id,
            distance_km,
            "discarding candidate: non-positive distance"
        );
        return None;
    }

    Some(ResolvedTrip {
        train_id: source_stop.train_id.clone(),
        train_name: source_stop.train_name.clone(),
        train_type: source_stop.train_type,
        source_stop: source_stop.clone(),
        destination_stop: destination_stop.clone(),
        distance_km,
        total_stops: route.len(),
        route: Arc::clone(route),
    })
}

impl RouteIndex {
    /// Validate raw station inputs and resolve them against this index.
    pub fn resolve(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<Vec<ResolvedTrip>, ResolveError> {
        let query = RouteQuery::new(source, destination)?;
        Ok(resolve(self, &query))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::TrainId;
    use proptest::prelude::*;

    /// Random trains over a small station set, with distance increasing
    /// along each route.
    fn network() -> impl Strategy<Value = RouteIndex> {
        prop::collection::vec(prop::collection::vec(0u8..6, 1..8), 0..6).prop_map(|trains| {
            let records = trains.into_iter().enumerate().flat_map(|(t, stations)| {
                stations.into_iter().enumerate().map(move |(seq, s)| {
                    StopRecord::new(
                        TrainId::parse(&format!("T{t}")).unwrap(),
                        seq as u32,
                        StationCode::parse(&format!("S{s}")).unwrap(),
                        format!("Station {s}"),
                    )
                    .with_distance(seq as f64 * 25.0)
                })
            });
            RouteIndex::from_records(records).0
        })
    }

    fn station() -> impl Strategy<Value = String> {
        (0u8..6).prop_map(|s| format!("S{s}"))
    }

    proptest! {
        /// resolve(A, A) is always empty
        #[test]
        fn same_station_never_resolves(idx in network(), a in station()) {
            prop_assert!(idx.resolve(&a, &a).unwrap().is_empty());
        }

        /// Every trip boards before it alights and covers positive distance
        #[test]
        fn trips_are_direction_correct(idx in network(), a in station(), b in station()) {
            for trip in idx.resolve(&a, &b).unwrap() {
                prop_assert!(trip.source_stop.sequence_no < trip.destination_stop.sequence_no);
                prop_assert!(trip.distance_km > 0.0);
                prop_assert_eq!(trip.total_stops, trip.route.len());
            }
        }

        /// A train is never valid in both directions for the same pair
        /// when each station appears once on its route
        #[test]
        fn direction_matters(idx in network(), a in station(), b in station()) {
            let ab = idx.resolve(&a, &b).unwrap();
            let ba = idx.resolve(&b, &a).unwrap();
            for trip in &ab {
                let route = &trip.route;
                let visits_once = |code: &StationCode| {
                    route.iter().filter(|s| &s.station_code == code).count() == 1
                };
                if visits_once(&trip.source_stop.station_code)
                    && visits_once(&trip.destination_stop.station_code)
                {
                    prop_assert!(ba.iter().all(|t| t.train_id != trip.train_id));
                }
            }
        }

        /// Repeated calls return the same sequence
        #[test]
        fn resolution_is_stable(idx in network(), a in station(), b in station()) {
            let first = idx.resolve(&a, &b).unwrap();
            let second = idx.resolve(&a, &b).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
