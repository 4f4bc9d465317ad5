//! Resolved trips.

use std::sync::Arc;

use crate::domain::{StopRecord, TrainId, TrainType};

/// A direction-correct ride on one train between two queried stations.
///
/// Built per request and never cached. Construction goes through the
/// resolver, which guarantees `source_stop` comes before `destination_stop`
/// on `route` and that `distance_km` is positive.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTrip {
    pub train_id: TrainId,
    pub train_name: String,
    pub train_type: TrainType,

    /// The stop at the queried source (not the train's origin).
    pub source_stop: StopRecord,

    /// The stop at the queried destination (not the train's terminus).
    pub destination_stop: StopRecord,

    /// Distance travelled between the two stops.
    pub distance_km: f64,

    /// Number of stops on the train's whole route.
    pub total_stops: usize,

    /// The train's entire route, ordered by sequence number.
    pub route: Arc<[StopRecord]>,
}

impl ResolvedTrip {
    /// The stops ridden, from boarding to alighting inclusive.
    pub fn sub_route(&self) -> &[StopRecord] {
        let start = self.position_of(&self.source_stop);
        let end = self.position_of(&self.destination_stop);
        match (start, end) {
            (Some(start), Some(end)) if start <= end => &self.route[start..=end],
            _ => &[],
        }
    }

    /// Number of stops strictly between boarding and alighting.
    pub fn intermediate_stop_count(&self) -> usize {
        self.sub_route().len().saturating_sub(2)
    }

    fn position_of(&self, stop: &StopRecord) -> Option<usize> {
        self.route.iter().position(|s| {
            s.sequence_no == stop.sequence_no && s.station_code == stop.station_code
        })
    }
}
