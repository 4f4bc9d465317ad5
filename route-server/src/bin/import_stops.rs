//! Load the timetable CSV into the SQLite stop store.
//!
//! Usage: `import-stops [CSV_PATH]`. The path defaults to `TRAIN_CSV_PATH`
//! and the database to `DATABASE_URL` (or `sqlite://stops.db`).

use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use route_server::config::AppConfig;
use route_server::ingest::read_csv_file;
use route_server::store::SqliteStore;

const DEFAULT_DATABASE_URL: &str = "sqlite://stops.db";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,sqlx=warn".into()))
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");
    let csv_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or(config.csv_path);
    let database_url = config
        .database_url
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

    info!(path = %csv_path.display(), "reading timetable CSV");
    let path = csv_path.clone();
    let source = tokio::task::spawn_blocking(move || read_csv_file(&path))
        .await
        .expect("CSV reader panicked")
        .expect("Failed to read timetable CSV");

    let mut records = Vec::with_capacity(source.rows.len());
    let mut rejected = 0usize;
    for row in &source.rows {
        match row.parse() {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(train = ?row.train_no, error = %e, "skipping invalid row");
                rejected += 1;
            }
        }
    }
    let skipped = rejected + source.unreadable;
    info!(accepted = records.len(), skipped, "parsed timetable rows");

    let store = SqliteStore::connect(&database_url)
        .await
        .expect("Failed to open stop database");
    let written = store
        .replace_all(&records)
        .await
        .expect("Failed to write stops");

    info!(
        database = %database_url,
        accepted = records.len(),
        skipped,
        written,
        "import complete"
    );
}
