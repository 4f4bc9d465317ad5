//! Flat tabular sources for the fallback index.

use std::path::PathBuf;

use futures::FutureExt;
use futures::future::BoxFuture;

use super::LoadError;
use crate::ingest::{RawStopRow, SourceRows, read_csv_file};

/// A source of raw stop rows, read in full on each call.
pub trait FlatSource: Send + Sync {
    fn read_rows(&self) -> BoxFuture<'_, Result<SourceRows, LoadError>>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// The timetable CSV export on local disk.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FlatSource for CsvSource {
    fn read_rows(&self) -> BoxFuture<'_, Result<SourceRows, LoadError>> {
        read_blocking(self.path.clone()).boxed()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Rows already held in memory.
///
/// Serves the same rows on every read. Useful for tests and for callers
/// that obtained the rows some other way.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<RawStopRow>,
}

impl MemorySource {
    pub fn new(rows: Vec<RawStopRow>) -> Self {
        Self { rows }
    }
}

impl FlatSource for MemorySource {
    fn read_rows(&self) -> BoxFuture<'_, Result<SourceRows, LoadError>> {
        let rows = SourceRows {
            rows: self.rows.clone(),
            unreadable: 0,
        };
        futures::future::ready(Ok(rows)).boxed()
    }

    fn describe(&self) -> String {
        format!("{} in-memory rows", self.rows.len())
    }
}

async fn read_blocking(path: PathBuf) -> Result<SourceRows, LoadError> {
    let rows = tokio::task::spawn_blocking(move || read_csv_file(&path)).await??;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_csv_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "Train No.,train Name,islno,station Code,Station Name,Arrival time,Departure time,\
             Distance,Source Station Code,source Station Name,Destination station Code,\
             Destination Station Name,train type"
        )
        .unwrap();
        writeln!(file, "'107',SWV-MAO,1,SWV,SAWANTWADI R,00:00:00,10:25:00,0,SWV,SAWANTWADI R,MAO,MADGOAN JN.,Local").unwrap();
        writeln!(file, "'107',SWV-MAO,2,THVM,THIVIM,11:06:00,11:08:00,32,SWV,SAWANTWADI R,MAO,MADGOAN JN.,Local").unwrap();

        let source = CsvSource::new(file.path());
        let rows = source.read_rows().await.unwrap();

        assert_eq!(rows.rows.len(), 2);
        assert_eq!(rows.unreadable, 0);
        assert!(source.describe().ends_with(
            file.path().file_name().unwrap().to_str().unwrap()
        ));
    }

    #[tokio::test]
    async fn missing_file_is_an_ingest_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvSource::new(dir.path().join("absent.csv"));

        let err = source.read_rows().await.unwrap_err();
        assert!(matches!(err, LoadError::Ingest(_)));
    }
}
