//! SQLite-backed stop store.

use std::str::FromStr;

use futures::FutureExt;
use futures::future::BoxFuture;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, info};

use super::{StopStore, StoreError};
use crate::domain::{ClockTime, Station, StationCode, StopRecord, TrainId, TrainType};
use crate::index::stop_order;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS stops (
        train_id TEXT NOT NULL,
        sequence_no INTEGER NOT NULL,
        station_code TEXT NOT NULL,
        station_name TEXT NOT NULL,
        arrival TEXT,
        departure TEXT,
        distance_km REAL NOT NULL,
        train_name TEXT NOT NULL,
        train_type TEXT NOT NULL,
        source_station_code TEXT,
        source_station_name TEXT NOT NULL,
        destination_station_code TEXT,
        destination_station_name TEXT NOT NULL,
        PRIMARY KEY (train_id, sequence_no, station_code)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_stops_station ON stops (station_code)",
];

const STOP_COLUMNS: &str = "train_id, sequence_no, station_code, station_name, arrival, departure, \
     distance_km, train_name, train_type, source_station_code, source_station_name, \
     destination_station_code, destination_station_name";

/// A stop as stored: plain columns, validated on the way out.
#[derive(Debug, sqlx::FromRow)]
struct StopRow {
    train_id: String,
    sequence_no: i64,
    station_code: String,
    station_name: String,
    arrival: Option<String>,
    departure: Option<String>,
    distance_km: f64,
    train_name: String,
    train_type: String,
    source_station_code: Option<String>,
    source_station_name: String,
    destination_station_code: Option<String>,
    destination_station_name: String,
}

impl TryFrom<StopRow> for StopRecord {
    type Error = StoreError;

    fn try_from(row: StopRow) -> Result<Self, Self::Error> {
        let train_id =
            TrainId::parse(&row.train_id).map_err(|e| StoreError::corrupt(e.to_string()))?;
        let station_code = StationCode::parse(&row.station_code)
            .map_err(|e| StoreError::corrupt(e.to_string()))?;
        let sequence_no = u32::try_from(row.sequence_no).map_err(|_| {
            StoreError::corrupt(format!("sequence number out of range: {}", row.sequence_no))
        })?;
        let train_type =
            TrainType::from_str(&row.train_type).map_err(|e| StoreError::corrupt(e.to_string()))?;

        let time = |raw: Option<String>| -> Result<Option<ClockTime>, StoreError> {
            raw.map(|s| ClockTime::parse(&s).map_err(|e| StoreError::corrupt(e.to_string())))
                .transpose()
        };
        let code = |raw: Option<String>| -> Result<Option<StationCode>, StoreError> {
            raw.map(|s| StationCode::parse(&s).map_err(|e| StoreError::corrupt(e.to_string())))
                .transpose()
        };

        Ok(StopRecord {
            train_id,
            sequence_no,
            station_code,
            station_name: row.station_name,
            arrival: time(row.arrival)?,
            departure: time(row.departure)?,
            distance_km: row.distance_km,
            train_name: row.train_name,
            train_type,
            source_station_code: code(row.source_station_code)?,
            source_station_name: row.source_station_name,
            destination_station_code: code(row.destination_station_code)?,
            destination_station_name: row.destination_station_name,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StationRow {
    station_code: String,
    station_name: String,
}

/// Stop store over a SQLite `stops` table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `url`, creating the database file and schema if needed.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let store = Self::from_pool(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Wrap an existing pool. The schema is not touched.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Replace the whole table with `records` in one transaction.
    ///
    /// Rows repeating an existing (train, sequence, station) key are
    /// dropped, keeping the same row the route index would keep. Returns the
    /// number of rows written.
    pub async fn replace_all(&self, records: &[StopRecord]) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        let cleared = sqlx::query("DELETE FROM stops")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        debug!(cleared, "cleared stops table");

        let insert = format!(
            "INSERT OR IGNORE INTO stops ({STOP_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );

        let mut ordered: Vec<&StopRecord> = records.iter().collect();
        ordered.sort_by(|a, b| a.train_id.cmp(&b.train_id).then_with(|| stop_order(a, b)));

        let mut written = 0;
        for stop in ordered {
            written += sqlx::query(&insert)
                .bind(stop.train_id.as_str())
                .bind(i64::from(stop.sequence_no))
                .bind(stop.station_code.as_str())
                .bind(&stop.station_name)
                .bind(stop.arrival.map(|t| t.to_string()))
                .bind(stop.departure.map(|t| t.to_string()))
                .bind(stop.distance_km)
                .bind(&stop.train_name)
                .bind(stop.train_type.as_str())
                .bind(stop.source_station_code.as_ref().map(StationCode::as_str))
                .bind(&stop.source_station_name)
                .bind(stop.destination_station_code.as_ref().map(StationCode::as_str))
                .bind(&stop.destination_station_name)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;
        info!(written, offered = records.len(), "replaced stops table");
        Ok(written)
    }

    /// Number of stored stops.
    pub async fn count(&self) -> Result<u64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM stops")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn fetch_stops(&self, sql: &str, key: &str) -> Result<Vec<StopRecord>, StoreError> {
        let rows: Vec<StopRow> = sqlx::query_as(sql).bind(key).fetch_all(&self.pool).await?;
        rows.into_iter().map(StopRecord::try_from).collect()
    }

    async fn fetch_stations(&self) -> Result<Vec<Station>, StoreError> {
        // Name taken from the lowest-numbered train, matching RouteIndex::stations
        let rows: Vec<StationRow> = sqlx::query_as(
            r#"
            SELECT station_code, station_name FROM (
                SELECT
                    station_code,
                    station_name,
                    ROW_NUMBER() OVER (
                        PARTITION BY station_code ORDER BY train_id, sequence_no
                    ) AS rn
                FROM stops
            )
            WHERE rn = 1
            ORDER BY station_code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<Station, StoreError> {
                let code = StationCode::parse(&row.station_code)
                    .map_err(|e| StoreError::corrupt(e.to_string()))?;
                Ok(Station {
                    code,
                    name: row.station_name,
                })
            })
            .collect()
    }
}

const STOPS_AT_STATION: &str = "WHERE station_code = ? ORDER BY train_id, sequence_no";
const STOPS_FOR_TRAIN: &str = "WHERE train_id = ? ORDER BY sequence_no, station_code";

impl StopStore for SqliteStore {
    fn stops_at_station<'a>(
        &'a self,
        station: &'a StationCode,
    ) -> BoxFuture<'a, Result<Vec<StopRecord>, StoreError>> {
        let sql = format!("SELECT {STOP_COLUMNS} FROM stops {STOPS_AT_STATION}");
        async move { self.fetch_stops(&sql, station.as_str()).await }.boxed()
    }

    fn stops_for_train<'a>(
        &'a self,
        train: &'a TrainId,
    ) -> BoxFuture<'a, Result<Vec<StopRecord>, StoreError>> {
        let sql = format!("SELECT {STOP_COLUMNS} FROM stops {STOPS_FOR_TRAIN}");
        async move { self.fetch_stops(&sql, train.as_str()).await }.boxed()
    }

    fn stations(&self) -> BoxFuture<'_, Result<Vec<Station>, StoreError>> {
        self.fetch_stations().boxed()
    }
}
