//! Stop records: one row per (train, station) visit.
//!
//! A `StopRecord` carries the stop itself plus denormalized metadata about
//! the train it belongs to (name, type, overall terminus). The metadata is
//! identical across all stops of one train.

use super::{ClockTime, StationCode, TrainId, TrainType};

/// One train's visit to one station.
#[derive(Debug, Clone, PartialEq)]
pub struct StopRecord {
    /// Train this stop belongs to.
    pub train_id: TrainId,

    /// Position along the train's route; strictly increasing per train.
    pub sequence_no: u32,

    /// Station visited.
    pub station_code: StationCode,

    /// Display name of the station.
    pub station_name: String,

    /// Arrival time. Placeholder at the first stop.
    pub arrival: Option<ClockTime>,

    /// Departure time. Placeholder at the last stop.
    pub departure: Option<ClockTime>,

    /// Distance from the train's origin in kilometres.
    pub distance_km: f64,

    pub train_name: String,
    pub train_type: TrainType,

    /// Code of the train's origin station.
    pub source_station_code: Option<StationCode>,
    pub source_station_name: String,

    /// Code of the train's final destination.
    pub destination_station_code: Option<StationCode>,
    pub destination_station_name: String,
}

impl StopRecord {
    /// Create a stop with the required fields; everything else is blank.
    pub fn new(
        train_id: TrainId,
        sequence_no: u32,
        station_code: StationCode,
        station_name: impl Into<String>,
    ) -> Self {
        Self {
            train_id,
            sequence_no,
            station_code,
            station_name: station_name.into(),
            arrival: None,
            departure: None,
            distance_km: 0.0,
            train_name: String::new(),
            train_type: TrainType::default(),
            source_station_code: None,
            source_station_name: String::new(),
            destination_station_code: None,
            destination_station_name: String::new(),
        }
    }

    /// Set the cumulative distance.
    pub fn with_distance(mut self, distance_km: f64) -> Self {
        self.distance_km = distance_km;
        self
    }

    /// Set the arrival and departure times.
    pub fn with_times(mut self, arrival: Option<ClockTime>, departure: Option<ClockTime>) -> Self {
        self.arrival = arrival;
        self.departure = departure;
        self
    }

    /// Set the train name and type.
    pub fn with_train(mut self, name: impl Into<String>, train_type: TrainType) -> Self {
        self.train_name = name.into();
        self.train_type = train_type;
        self
    }

    /// Time a passenger would board here: departure, or arrival if the
    /// departure is missing.
    pub fn boarding_time(&self) -> Option<ClockTime> {
        self.departure.or(self.arrival)
    }
}
