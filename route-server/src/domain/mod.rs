//! Domain types for train route search.
//!
//! This module contains the core domain model types that represent
//! validated timetable data. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod station;
mod stop;
mod time;
mod train;

pub use station::{InvalidStationCode, Station, StationCode};
pub use stop::StopRecord;
pub use time::{ClockTime, ClockTimeError};
pub use train::{InvalidTrainId, TrainId, TrainType, UnknownTrainType};
