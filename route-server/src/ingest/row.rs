//! Untyped stop rows and their conversion into `StopRecord`.

use serde::Deserialize;

use crate::domain::{
    ClockTime, InvalidStationCode, InvalidTrainId, StationCode, StopRecord, TrainId, TrainType,
    UnknownTrainType,
};

/// A stop row exactly as it appears in the timetable export.
///
/// Every field is optional: the export has blank cells and short lines, and
/// rejecting a row is the job of [`RawStopRow::parse`], not of the reader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawStopRow {
    #[serde(rename = "Train No.")]
    pub train_no: Option<String>,

    #[serde(rename = "train Name")]
    pub train_name: Option<String>,

    #[serde(rename = "islno")]
    pub sequence_no: Option<String>,

    #[serde(rename = "station Code")]
    pub station_code: Option<String>,

    #[serde(rename = "Station Name")]
    pub station_name: Option<String>,

    #[serde(rename = "Arrival time")]
    pub arrival_time: Option<String>,

    #[serde(rename = "Departure time")]
    pub departure_time: Option<String>,

    #[serde(rename = "Distance")]
    pub distance: Option<String>,

    #[serde(rename = "Source Station Code")]
    pub source_station_code: Option<String>,

    #[serde(rename = "source Station Name")]
    pub source_station_name: Option<String>,

    #[serde(rename = "Destination station Code")]
    pub destination_station_code: Option<String>,

    #[serde(rename = "Destination Station Name")]
    pub destination_station_name: Option<String>,

    #[serde(rename = "train type")]
    pub train_type: Option<String>,
}

/// Why a row could not become a `StopRecord`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    /// A required column is absent or blank
    #[error("missing required field: {0}")]
    Missing(&'static str),

    #[error(transparent)]
    TrainId(#[from] InvalidTrainId),

    #[error(transparent)]
    StationCode(#[from] InvalidStationCode),

    /// Sequence number is not a non-negative integer
    #[error("invalid sequence number: {0:?}")]
    InvalidSequence(String),

    #[error(transparent)]
    TrainType(#[from] UnknownTrainType),
}

impl RawStopRow {
    /// Validate and normalize this row.
    ///
    /// Train number, station code and sequence number are required. Times
    /// that fail to parse become `None`; a distance that is missing,
    /// negative or not a number becomes `0.0`. A blank train type means
    /// Express.
    pub fn parse(&self) -> Result<StopRecord, RowError> {
        let train_id = TrainId::parse(required(&self.train_no, "train number")?)?;
        let station_code = StationCode::parse(required(&self.station_code, "station code")?)?;

        let raw_sequence = required(&self.sequence_no, "sequence number")?;
        let sequence_no = raw_sequence
            .trim()
            .parse::<u32>()
            .map_err(|_| RowError::InvalidSequence(raw_sequence.to_string()))?;

        let train_type = match non_blank(&self.train_type) {
            Some(raw) => raw.parse::<TrainType>()?,
            None => TrainType::default(),
        };

        Ok(StopRecord {
            train_id,
            sequence_no,
            station_code,
            station_name: text(&self.station_name),
            arrival: ClockTime::parse_lenient(non_blank(&self.arrival_time)),
            departure: ClockTime::parse_lenient(non_blank(&self.departure_time)),
            distance_km: parse_distance(non_blank(&self.distance)),
            train_name: text(&self.train_name),
            train_type,
            source_station_code: non_blank(&self.source_station_code)
                .and_then(|s| StationCode::parse(s).ok()),
            source_station_name: text(&self.source_station_name),
            destination_station_code: non_blank(&self.destination_station_code)
                .and_then(|s| StationCode::parse(s).ok()),
            destination_station_name: text(&self.destination_station_name),
        })
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

fn required<'a>(field: &'a Option<String>, name: &'static str) -> Result<&'a str, RowError> {
    non_blank(field).ok_or(RowError::Missing(name))
}

fn text(field: &Option<String>) -> String {
    field.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn parse_distance(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> RawStopRow {
        RawStopRow {
            train_no: Some("'12951'".into()),
            train_name: Some(" Mumbai Rajdhani ".into()),
            sequence_no: Some("2".into()),
            station_code: Some(" bvi ".into()),
            station_name: Some("Borivali".into()),
            arrival_time: Some("17:22:00".into()),
            departure_time: Some("17:24:00".into()),
            distance: Some("30".into()),
            source_station_code: Some("BCT".into()),
            source_station_name: Some("Mumbai Central".into()),
            destination_station_code: Some("NDLS".into()),
            destination_station_name: Some("New Delhi".into()),
            train_type: Some("Superfast".into()),
        }
    }

    #[test]
    fn parses_complete_row() {
        let stop = row().parse().unwrap();
        assert_eq!(stop.train_id.as_str(), "12951");
        assert_eq!(stop.train_name, "Mumbai Rajdhani");
        assert_eq!(stop.sequence_no, 2);
        assert_eq!(stop.station_code.as_str(), "BVI");
        assert_eq!(stop.arrival, ClockTime::from_hms(17, 22, 0));
        assert_eq!(stop.departure, ClockTime::from_hms(17, 24, 0));
        assert_eq!(stop.distance_km, 30.0);
        assert_eq!(stop.train_type, TrainType::Superfast);
        assert_eq!(stop.source_station_code.unwrap().as_str(), "BCT");
        assert_eq!(stop.destination_station_name, "New Delhi");
    }

    #[test]
    fn missing_station_code_is_rejected() {
        let mut raw = row();
        raw.station_code = None;
        assert_eq!(raw.parse(), Err(RowError::Missing("station code")));

        raw.station_code = Some("   ".into());
        assert_eq!(raw.parse(), Err(RowError::Missing("station code")));
    }

    #[test]
    fn spaced_station_code_is_accepted() {
        let mut raw = row();
        raw.station_code = Some(" b vi ".into());
        assert_eq!(raw.parse().unwrap().station_code.as_str(), "B VI");
    }

    #[test]
    fn missing_train_number_is_rejected() {
        let mut raw = row();
        raw.train_no = None;
        assert_eq!(raw.parse(), Err(RowError::Missing("train number")));
    }

    #[test]
    fn quote_only_train_number_is_rejected() {
        let mut raw = row();
        raw.train_no = Some("''".into());
        assert!(matches!(raw.parse(), Err(RowError::TrainId(_))));
    }

    #[test]
    fn bad_sequence_is_rejected() {
        let mut raw = row();
        raw.sequence_no = Some("two".into());
        assert_eq!(raw.parse(), Err(RowError::InvalidSequence("two".into())));

        raw.sequence_no = None;
        assert_eq!(raw.parse(), Err(RowError::Missing("sequence number")));
    }

    #[test]
    fn unknown_train_type_is_rejected() {
        let mut raw = row();
        raw.train_type = Some("Shatabdi".into());
        assert!(matches!(raw.parse(), Err(RowError::TrainType(_))));
    }

    #[test]
    fn blank_train_type_defaults_to_express() {
        let mut raw = row();
        raw.train_type = Some("".into());
        assert_eq!(raw.parse().unwrap().train_type, TrainType::Express);
    }

    #[test]
    fn optional_fields_degrade_gracefully() {
        let mut raw = row();
        raw.arrival_time = Some("00:00".into());
        raw.departure_time = Some("--".into());
        raw.distance = Some("-5".into());
        raw.source_station_code = Some("".into());

        let stop = raw.parse().unwrap();
        assert_eq!(stop.arrival, ClockTime::from_hms(0, 0, 0));
        assert_eq!(stop.departure, None);
        assert_eq!(stop.distance_km, 0.0);
        assert_eq!(stop.source_station_code, None);
    }

    #[test]
    fn unparseable_distance_is_zero() {
        assert_eq!(parse_distance(Some("abc")), 0.0);
        assert_eq!(parse_distance(Some("NaN")), 0.0);
        assert_eq!(parse_distance(None), 0.0);
        assert_eq!(parse_distance(Some(" 1386 ")), 1386.0);
    }

    #[test]
    fn error_display() {
        assert_eq!(
            RowError::Missing("station code").to_string(),
            "missing required field: station code"
        );
        assert_eq!(
            RowError::InvalidSequence("x".into()).to_string(),
            "invalid sequence number: \"x\""
        );
    }
}
