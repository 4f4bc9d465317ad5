//! Timetable clock times.
//!
//! The timetable gives local clock times as "HH:MM:SS" strings with no date.
//! The first stop's arrival and the last stop's departure carry placeholder
//! values in the source data, so callers generally treat a `ClockTime` as
//! informational rather than as an instant.

use chrono::{NaiveTime, Timelike};
use std::fmt;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct ClockTimeError {
    reason: &'static str,
}

impl ClockTimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day from the timetable.
///
/// # Examples
///
/// ```
/// use route_server::domain::ClockTime;
///
/// let t = ClockTime::parse("14:30:00").unwrap();
/// assert_eq!(t.to_string(), "14:30:00");
///
/// // HH:MM is accepted too
/// assert_eq!(ClockTime::parse("06:05").unwrap().to_string(), "06:05:00");
///
/// assert!(ClockTime::parse("25:00:00").is_err());
/// assert!(ClockTime::parse("1430").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Create a clock time from components, if they are in range.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, second).map(ClockTime)
    }

    /// Parse a time in "HH:MM:SS" or "HH:MM" format.
    pub fn parse(s: &str) -> Result<Self, ClockTimeError> {
        let bytes = s.trim().as_bytes();

        if bytes.len() != 5 && bytes.len() != 8 {
            return Err(ClockTimeError::new("expected HH:MM:SS format"));
        }

        if bytes[2] != b':' || (bytes.len() == 8 && bytes[5] != b':') {
            return Err(ClockTimeError::new("expected colon separators"));
        }

        let hour = parse_two_digits(&bytes[0..2])
            .ok_or_else(|| ClockTimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(ClockTimeError::new("hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| ClockTimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(ClockTimeError::new("minute must be 0-59"));
        }

        let second = if bytes.len() == 8 {
            let second = parse_two_digits(&bytes[6..8])
                .ok_or_else(|| ClockTimeError::new("invalid second digits"))?;
            if second > 59 {
                return Err(ClockTimeError::new("second must be 0-59"));
            }
            second
        } else {
            0
        };

        Self::from_hms(hour, minute, second).ok_or_else(|| ClockTimeError::new("invalid time"))
    }

    /// Parse an optional raw field, treating blanks and bad values as absent.
    pub fn parse_lenient(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|s| Self::parse(s).ok())
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Returns the underlying chrono time.
    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({})", self)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        )
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Display output parses back to the same time
        #[test]
        fn display_parses_back(h in 0u32..24, m in 0u32..60, s in 0u32..60) {
            let t = ClockTime::from_hms(h, m, s).unwrap();
            prop_assert_eq!(ClockTime::parse(&t.to_string()).unwrap(), t);
        }

        /// Parsing never panics on arbitrary input
        #[test]
        fn parse_never_panics(s in "\\PC{0,12}") {
            let _ = ClockTime::parse(&s);
        }
    }
}
