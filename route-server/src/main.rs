use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use route_server::config::AppConfig;
use route_server::delay::{DelayService, PredictionClient};
use route_server::fallback::{CsvSource, FallbackLoader};
use route_server::search::SearchService;
use route_server::store::{MemoryStore, SqliteStore, StopStore};
use route_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info,sqlx=warn".into()),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Primary store
    let store: Arc<dyn StopStore> = match &config.database_url {
        Some(url) => {
            let store = SqliteStore::connect(url)
                .await
                .expect("Failed to open stop database");
            let rows = store.count().await.expect("Failed to count stops");
            info!(rows, "connected to stop database");
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set, all searches will use the CSV fallback");
            Arc::new(MemoryStore::default())
        }
    };

    // Fallback index, loaded on first use
    let source = CsvSource::new(config.csv_path.clone());
    info!(path = %config.csv_path.display(), "fallback source configured");
    let fallback = Arc::new(FallbackLoader::new(source, config.fallback.clone()));

    let search = SearchService::new(store, fallback);

    // Delay prediction
    let client =
        PredictionClient::new(config.prediction.clone()).expect("Failed to create prediction client");
    info!(url = %config.prediction.base_url, "prediction service configured");
    let delays = DelayService::new(Some(Box::new(client)), &config.prediction_cache);

    let app = create_router(AppState::new(search, delays));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    info!(addr = %config.bind_addr, "route server listening");
    info!("  GET  /api/health             - Health check");
    info!("  GET  /api/trains/search      - Trains between two stations");
    info!("  GET  /api/trains/stations    - All known stations");
    info!("  GET  /api/trains/:train_no   - Stops of one train");
    info!("  POST /api/delays/predict     - Predict a delay");

    axum::serve(listener, app).await.expect("Server error");
}
