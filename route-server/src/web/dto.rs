//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::delay::{
    Congestion, DayOfWeek, DelayAssessment, DelayCategory, Suggestion, TimeOfDay, Weather,
};
use crate::domain::{ClockTime, Station, StopRecord, TrainType};
use crate::resolver::ResolvedTrip;

/// Query for `GET /api/trains/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    pub source: Option<String>,
    pub destination: Option<String>,

    /// Travel date, `YYYY-MM-DD`. Defaults to today.
    pub date: Option<String>,

    pub weather: Option<Weather>,
    pub congestion: Option<Congestion>,
}

/// Echo of the search inputs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub source: String,
    pub destination: String,
    pub date: String,
    pub weather: Weather,
    pub congestion: Congestion,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub trains: Vec<TrainResult>,
    pub count: usize,
    pub search_params: SearchParams,

    /// `"store"` or `"csv"`.
    pub source: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One end of a trip.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripStation {
    pub code: String,
    pub name: String,
    pub arrival_time: Option<String>,
    pub departure_time: Option<String>,
}

/// One stop on a route listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopResult {
    pub station_code: String,
    pub station_name: String,
    pub arrival_time: Option<String>,
    pub departure_time: Option<String>,
    pub distance: f64,
}

/// A train in search results, with its delay prediction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainResult {
    pub train_no: String,
    pub train_name: String,
    pub train_type: TrainType,
    pub source_station: TripStation,
    pub destination_station: TripStation,

    /// Kilometres between the queried stations.
    pub distance: f64,

    pub total_stops: usize,
    pub route: Vec<StopResult>,
    pub prediction: PredictionResponse,
}

#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<StationResult>,
}

#[derive(Debug, Serialize)]
pub struct StationResult {
    pub code: String,
    pub name: String,
}

/// A train's origin or terminus.
#[derive(Debug, Serialize)]
pub struct Terminal {
    pub code: Option<String>,
    pub name: String,
}

/// Response for `GET /api/trains/{trainNo}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainDetailResponse {
    pub train_no: String,
    pub train_name: String,
    pub train_type: TrainType,
    pub source: Terminal,
    pub destination: Terminal,
    pub stops: Vec<StopResult>,
}

/// Body for `POST /api/delays/predict`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    pub distance: f64,
    pub weather_conditions: Weather,
    pub day_of_week: DayOfWeek,
    pub time_of_day: TimeOfDay,
    pub train_type: TrainType,
    pub route_congestion: Congestion,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub predicted_delay: u32,
    pub delay_category: DelayCategory,
    pub suggestions: Vec<Suggestion>,
    pub confidence: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

fn format_time(time: Option<ClockTime>) -> Option<String> {
    time.map(|t| t.to_string())
}

impl From<&StopRecord> for StopResult {
    fn from(stop: &StopRecord) -> Self {
        Self {
            station_code: stop.station_code.to_string(),
            station_name: stop.station_name.clone(),
            arrival_time: format_time(stop.arrival),
            departure_time: format_time(stop.departure),
            distance: stop.distance_km,
        }
    }
}

impl From<&StopRecord> for TripStation {
    fn from(stop: &StopRecord) -> Self {
        Self {
            code: stop.station_code.to_string(),
            name: stop.station_name.clone(),
            arrival_time: format_time(stop.arrival),
            departure_time: format_time(stop.departure),
        }
    }
}

impl From<DelayAssessment> for PredictionResponse {
    fn from(a: DelayAssessment) -> Self {
        Self {
            predicted_delay: a.predicted_delay,
            delay_category: a.category,
            suggestions: a.suggestions,
            confidence: a.confidence,
            note: a.note,
        }
    }
}

impl From<Station> for StationResult {
    fn from(station: Station) -> Self {
        Self {
            code: station.code.to_string(),
            name: station.name,
        }
    }
}

impl TrainResult {
    /// Create from a resolved trip and its delay assessment.
    pub fn from_trip(trip: &ResolvedTrip, assessment: DelayAssessment) -> Self {
        Self {
            train_no: trip.train_id.to_string(),
            train_name: trip.train_name.clone(),
            train_type: trip.train_type,
            source_station: TripStation::from(&trip.source_stop),
            destination_station: TripStation::from(&trip.destination_stop),
            distance: trip.distance_km,
            total_stops: trip.total_stops,
            route: trip.route.iter().map(StopResult::from).collect(),
            prediction: assessment.into(),
        }
    }
}

impl TrainDetailResponse {
    /// Create from a train's stops, ordered by sequence. `None` if empty.
    pub fn from_stops(stops: &[StopRecord]) -> Option<Self> {
        let first = stops.first()?;
        Some(Self {
            train_no: first.train_id.to_string(),
            train_name: first.train_name.clone(),
            train_type: first.train_type,
            source: Terminal {
                code: first.source_station_code.as_ref().map(ToString::to_string),
                name: first.source_station_name.clone(),
            },
            destination: Terminal {
                code: first.destination_station_code.as_ref().map(ToString::to_string),
                name: first.destination_station_name.clone(),
            },
            stops: stops.iter().map(StopResult::from).collect(),
        })
    }
}
