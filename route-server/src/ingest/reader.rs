//! CSV reader for the timetable export.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::row::RawStopRow;

/// Errors that stop a CSV source from being read at all.
///
/// Individual bad records are not errors; they are counted in
/// [`SourceRows::unreadable`].
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Rows read from a flat source, before validation.
#[derive(Debug, Default)]
pub struct SourceRows {
    pub rows: Vec<RawStopRow>,

    /// Records the CSV decoder could not turn into a row at all.
    pub unreadable: usize,
}

/// Read every record from a CSV stream with the timetable header.
///
/// Fails only if the header cannot be read; undecodable records are
/// skipped and counted.
pub fn read_rows<R: Read>(reader: R) -> Result<SourceRows, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    debug!(columns = headers.len(), "read CSV header");

    let mut out = SourceRows::default();
    for (idx, result) in rdr.deserialize::<RawStopRow>().enumerate() {
        match result {
            Ok(row) => out.rows.push(row),
            Err(e) => {
                // +2: one for the header, one for 1-based line numbers
                warn!(line = idx + 2, error = %e, "skipping unreadable CSV record");
                out.unreadable += 1;
            }
        }
    }

    Ok(out)
}

/// Read a CSV file from disk. Blocking.
pub fn read_csv_file(path: &Path) -> Result<SourceRows, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_rows(file)
}
