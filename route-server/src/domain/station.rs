//! Station code types.

use std::fmt;

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A normalized station code (e.g. `NDLS`, `BCT`, `STN_A`).
///
/// Codes are compared case-insensitively and ignoring surrounding
/// whitespace in the raw data. Normalization happens once, here, so every
/// `StationCode` value is already trimmed and uppercase and lookups can use
/// exact matching.
///
/// # Examples
///
/// ```
/// use route_server::domain::StationCode;
///
/// let ndls = StationCode::parse("  ndls ").unwrap();
/// assert_eq!(ndls.as_str(), "NDLS");
///
/// // Empty input is rejected
/// assert!(StationCode::parse("   ").is_err());
///
/// // Interior spacing is kept as-is
/// assert_eq!(StationCode::parse(" nd ls").unwrap().as_str(), "ND LS");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode(String);

impl StationCode {
    /// Parse and normalize a station code.
    ///
    /// Surrounding whitespace is trimmed and ASCII letters are uppercased.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidStationCode {
                reason: "must not be empty",
            });
        }

        Ok(StationCode(trimmed.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A station as listed for lookup: its code and a representative name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub code: StationCode,
    pub name: String,
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.0)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
