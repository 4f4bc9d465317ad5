//! Ingestion boundary for timetable rows.
//!
//! Rows arrive untyped (CSV cells, database columns) and are converted into
//! `StopRecord`s here. Nothing past this module sees an unvalidated row.

mod reader;
mod row;

pub use reader::{IngestError, SourceRows, read_csv_file, read_rows};
pub use row::{RawStopRow, RowError};
