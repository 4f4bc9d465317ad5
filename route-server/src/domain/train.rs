//! Train identifier and category types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid train number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid train number: {reason}")]
pub struct InvalidTrainId {
    reason: &'static str,
}

/// A train number, shared by every stop of one physical train.
///
/// The timetable export quotes train numbers (`'12951'`); the quotes are
/// stripped at parse time so that `'12951'`, `12951` and ` 12951 ` all
/// identify the same train.
///
/// # Examples
///
/// ```
/// use route_server::domain::TrainId;
///
/// let id = TrainId::parse("'12951'").unwrap();
/// assert_eq!(id.as_str(), "12951");
///
/// assert!(TrainId::parse("''").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrainId(String);

impl TrainId {
    /// Parse a train number, removing quote characters and padding.
    pub fn parse(s: &str) -> Result<Self, InvalidTrainId> {
        let unquoted: String = s.chars().filter(|&c| c != '\'').collect();
        let trimmed = unquoted.trim();

        if trimmed.is_empty() {
            return Err(InvalidTrainId {
                reason: "must not be empty",
            });
        }

        Ok(TrainId(trimmed.to_string()))
    }

    /// Returns the train number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrainId({})", self.0)
    }
}

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned for a train type outside the known categories.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown train type: {0:?}")]
pub struct UnknownTrainType(pub String);

/// Service category of a train.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainType {
    #[default]
    Express,
    Superfast,
    Local,
}

impl TrainType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainType::Express => "Express",
            TrainType::Superfast => "Superfast",
            TrainType::Local => "Local",
        }
    }
}

impl FromStr for TrainType {
    type Err = UnknownTrainType;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "express" => Ok(TrainType::Express),
            "superfast" => Ok(TrainType::Superfast),
            "local" => Ok(TrainType::Local),
            _ => Err(UnknownTrainType(s.to_string())),
        }
    }
}

impl fmt::Display for TrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
