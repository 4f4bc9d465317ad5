//! Inputs to delay prediction.

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::domain::{ClockTime, TrainType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Clear,
    Rainy,
    Foggy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Congestion {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

/// Coarse part of the day a train departs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// 06-11 morning, 12-16 afternoon, 17-20 evening, otherwise night.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn from_clock(time: ClockTime) -> Self {
        Self::from_hour(time.hour())
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Weather::Clear => "Clear",
            Weather::Rainy => "Rainy",
            Weather::Foggy => "Foggy",
        };
        f.write_str(s)
    }
}

/// Everything a predictor sees about one trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayFeatures {
    pub distance_km: f64,
    pub weather: Weather,
    pub day_of_week: DayOfWeek,
    pub time_of_day: TimeOfDay,
    pub train_type: TrainType,
    pub congestion: Congestion,
}
