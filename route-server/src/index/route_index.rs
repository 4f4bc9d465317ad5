//! Train → stops and station → trains index.
//!
//! Every route query reduces to two lookups: which trains call at the
//! source, and which call at the destination. Grouping stop rows by train
//! once, and inverting that grouping by station, makes candidate lookup a
//! pair of map reads followed by a set intersection.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{Station, StationCode, StopRecord, TrainId};
use crate::ingest::RawStopRow;

/// Counts from one index build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Rows that parsed into a `StopRecord`.
    pub accepted: usize,

    /// Rows rejected as malformed (missing train, station or sequence).
    pub skipped: usize,

    /// Accepted rows dropped because the same train already had a stop with
    /// the same sequence number and station.
    pub duplicates: usize,
}

/// Derived lookup structure over a set of stop records.
///
/// `by_station` is exactly the inverse of `by_train`: a train appears under
/// a station if and only if one of its stops is at that station.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteIndex {
    /// Each train's stops, ordered by sequence number.
    by_train: HashMap<TrainId, Arc<[StopRecord]>>,

    /// Trains calling at each station. Ordered so that iteration, and
    /// therefore result order, is stable.
    by_station: HashMap<StationCode, BTreeSet<TrainId>>,
}

impl RouteIndex {
    /// An index with no trains.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an index from untyped rows.
    ///
    /// Malformed rows are skipped one at a time and counted; they never
    /// abort the build.
    pub fn build<I>(rows: I) -> (Self, BuildReport)
    where
        I: IntoIterator<Item = RawStopRow>,
    {
        let mut skipped = 0;
        let records = rows
            .into_iter()
            .enumerate()
            .filter_map(|(idx, row)| match row.parse() {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!(row = idx, error = %e, "skipping malformed stop row");
                    skipped += 1;
                    None
                }
            });

        let (index, mut report) = Self::from_records(records);
        report.skipped = skipped;

        if skipped > 0 {
            warn!(
                skipped,
                accepted = report.accepted,
                "skipped malformed stop rows while building route index"
            );
        }

        (index, report)
    }

    /// Build an index from already-validated records.
    ///
    /// The result depends only on the set of records, not their order. When
    /// several records share a (sequence, station) key, the one with the
    /// lowest distance is kept, with remaining ties broken field by field.
    pub fn from_records<I>(records: I) -> (Self, BuildReport)
    where
        I: IntoIterator<Item = StopRecord>,
    {
        let mut report = BuildReport::default();
        let mut grouped: HashMap<TrainId, Vec<StopRecord>> = HashMap::new();

        for record in records {
            report.accepted += 1;
            grouped
                .entry(record.train_id.clone())
                .or_default()
                .push(record);
        }

        let mut by_station: HashMap<StationCode, BTreeSet<TrainId>> = HashMap::new();
        let mut by_train = HashMap::with_capacity(grouped.len());

        for (train_id, mut stops) in grouped {
            stops.sort_by(stop_order);

            let before = stops.len();
            stops.dedup_by(|a, b| {
                a.sequence_no == b.sequence_no && a.station_code == b.station_code
            });
            report.duplicates += before - stops.len();

            for stop in &stops {
                by_station
                    .entry(stop.station_code.clone())
                    .or_default()
                    .insert(train_id.clone());
            }

            by_train.insert(train_id, Arc::from(stops));
        }

        (
            Self {
                by_train,
                by_station,
            },
            report,
        )
    }

    /// Trains calling at a station.
    pub fn trains_at(&self, station: &StationCode) -> Option<&BTreeSet<TrainId>> {
        self.by_station.get(station)
    }

    /// A train's full route, ordered by sequence number.
    pub fn route(&self, train: &TrainId) -> Option<&Arc<[StopRecord]>> {
        self.by_train.get(train)
    }

    /// A train's stops, or an empty slice for an unknown train.
    pub fn stops_for_train(&self, train: &TrainId) -> &[StopRecord] {
        self.by_train.get(train).map(|r| &r[..]).unwrap_or(&[])
    }

    /// Every stop at a station, ordered by train then sequence number.
    pub fn stops_at_station(&self, station: &StationCode) -> Vec<StopRecord> {
        let Some(trains) = self.by_station.get(station) else {
            return Vec::new();
        };

        trains
            .iter()
            .flat_map(|train| self.stops_for_train(train))
            .filter(|stop| &stop.station_code == station)
            .cloned()
            .collect()
    }

    /// All stations, ordered by code.
    ///
    /// The name comes from the lowest-numbered train calling there, so the
    /// listing is stable when different trains spell a station differently.
    pub fn stations(&self) -> Vec<Station> {
        let mut stations: Vec<Station> = self
            .by_station
            .iter()
            .filter_map(|(code, trains)| {
                let first_train = trains.iter().next()?;
                let stop = self
                    .stops_for_train(first_train)
                    .iter()
                    .find(|s| &s.station_code == code)?;
                Some(Station {
                    code: code.clone(),
                    name: stop.station_name.clone(),
                })
            })
            .collect();

        stations.sort_by(|a, b| a.code.cmp(&b.code));
        stations
    }

    /// Iterate over every train and its route. Order is unspecified.
    pub fn trains(&self) -> impl Iterator<Item = (&TrainId, &Arc<[StopRecord]>)> {
        self.by_train.iter()
    }

    pub fn train_count(&self) -> usize {
        self.by_train.len()
    }

    pub fn station_count(&self) -> usize {
        self.by_station.len()
    }

    /// Total number of stop records held.
    pub fn stop_count(&self) -> usize {
        self.by_train.values().map(|r| r.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_train.is_empty()
    }
}

/// Total order on one train's stops: sequence number, then station code,
/// then every remaining field so that records sharing a key still sort
/// deterministically.
pub(crate) fn stop_order(a: &StopRecord, b: &StopRecord) -> Ordering {
    a.sequence_no
        .cmp(&b.sequence_no)
        .then_with(|| a.station_code.cmp(&b.station_code))
        .then_with(|| a.distance_km.total_cmp(&b.distance_km))
        .then_with(|| a.station_name.cmp(&b.station_name))
        .then_with(|| a.arrival.cmp(&b.arrival))
        .then_with(|| a.departure.cmp(&b.departure))
        .then_with(|| a.train_name.cmp(&b.train_name))
        .then_with(|| a.train_type.as_str().cmp(b.train_type.as_str()))
        .then_with(|| a.source_station_code.cmp(&b.source_station_code))
        .then_with(|| a.source_station_name.cmp(&b.source_station_name))
        .then_with(|| a.destination_station_code.cmp(&b.destination_station_code))
        .then_with(|| a.destination_station_name.cmp(&b.destination_station_name))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Records keyed by (train, seq, station); the distance is a function of
    /// the key so exact duplicates are identical records.
    fn records() -> impl Strategy<Value = Vec<StopRecord>> {
        prop::collection::vec((0u8..5, 0u32..15, 0u8..8), 0..60).prop_map(|keys| {
            keys.into_iter()
                .map(|(t, seq, s)| {
                    StopRecord::new(
                        TrainId::parse(&format!("T{t}")).unwrap(),
                        seq,
                        StationCode::parse(&format!("S{s}")).unwrap(),
                        format!("Station {s}"),
                    )
                    .with_distance(f64::from(seq) * 10.0)
                })
                .collect()
        })
    }

    /// Like [`records`], but distance and name vary independently of the
    /// key, so rows sharing a key can disagree.
    fn conflicting_records() -> impl Strategy<Value = Vec<StopRecord>> {
        prop::collection::vec((0u8..3, 0u32..6, 0u8..4, 0u32..500, 0u8..3), 0..40).prop_map(
            |rows| {
                rows.into_iter()
                    .map(|(t, seq, s, km, name)| {
                        StopRecord::new(
                            TrainId::parse(&format!("T{t}")).unwrap(),
                            seq,
                            StationCode::parse(&format!("S{s}")).unwrap(),
                            format!("Station {s}/{name}"),
                        )
                        .with_distance(f64::from(km))
                    })
                    .collect()
            },
        )
    }

    proptest! {
        /// Rows sharing a key but differing elsewhere collapse to the same
        /// record whatever the input order
        #[test]
        fn conflicting_duplicates_are_order_independent(
            input in conflicting_records(),
            seed in any::<u64>(),
        ) {
            let mut shuffled = input.clone();
            shuffled.reverse();
            if !shuffled.is_empty() {
                let len = shuffled.len();
                shuffled.rotate_left((seed % len as u64) as usize);
            }

            let (first, first_report) = RouteIndex::from_records(input);
            let (second, second_report) = RouteIndex::from_records(shuffled);

            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first_report, second_report);
        }

        /// Each train's route is its input rows sorted by sequence number
        #[test]
        fn routes_preserve_sequence_order(input in records()) {
            let (index, _) = RouteIndex::from_records(input.clone());

            for (train, route) in index.trains() {
                let mut expected: Vec<_> = input
                    .iter()
                    .filter(|r| &r.train_id == train)
                    .map(|r| (r.sequence_no, r.station_code.clone()))
                    .collect();
                expected.sort();
                expected.dedup();

                let actual: Vec<_> = route
                    .iter()
                    .map(|r| (r.sequence_no, r.station_code.clone()))
                    .collect();
                prop_assert_eq!(actual, expected);
            }
        }

        /// by_station is exactly the inverse of by_train
        #[test]
        fn station_index_inverts_train_index(input in records()) {
            let (index, _) = RouteIndex::from_records(input);

            for (train, route) in index.trains() {
                for stop in route.iter() {
                    let trains = index.trains_at(&stop.station_code);
                    prop_assert!(trains.is_some_and(|t| t.contains(train)));
                }
            }

            for station in index.stations() {
                for train in index.trains_at(&station.code).unwrap() {
                    prop_assert!(index
                        .stops_for_train(train)
                        .iter()
                        .any(|s| s.station_code == station.code));
                }
            }
        }

        /// Building twice, in any order, yields the same index
        #[test]
        fn rebuild_is_idempotent(input in records()) {
            let mut reversed = input.clone();
            reversed.reverse();

            let (first, _) = RouteIndex::from_records(input.clone());
            let (second, _) = RouteIndex::from_records(input);
            let (third, _) = RouteIndex::from_records(reversed);

            prop_assert_eq!(&first, &second);
            prop_assert_eq!(&first, &third);
        }

        /// No stop is lost except exact duplicates
        #[test]
        fn stop_count_accounts_for_duplicates(input in records()) {
            let total = input.len();
            let (index, report) = RouteIndex::from_records(input);
            prop_assert_eq!(report.accepted, total);
            prop_assert_eq!(index.stop_count() + report.duplicates, total);
        }
    }
}
