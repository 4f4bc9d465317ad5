//! Lazily built fallback route index.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::OnceCell;
use tracing::{info, warn};

use super::LoadError;
use super::source::FlatSource;
use crate::index::RouteIndex;
use crate::ingest::SourceRows;
use crate::resolver::{ResolvedTrip, RouteQuery, resolve};

/// Configuration for the fallback loader.
#[derive(Debug, Clone)]
pub struct FallbackConfig {
    /// Upper bound on reading the source and building the index.
    pub load_timeout: Duration,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            load_timeout: Duration::from_secs(60),
        }
    }
}

impl FallbackConfig {
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }
}

type IndexCell = Arc<OnceCell<Arc<RouteIndex>>>;

/// Builds a [`RouteIndex`] from a flat source on first use and keeps it.
///
/// Concurrent first callers share one build. A failed or timed-out build
/// leaves nothing cached, so the next caller tries again.
pub struct FallbackLoader {
    source: Box<dyn FlatSource>,
    config: FallbackConfig,

    /// Swapped for a fresh cell on invalidation. Callers already waiting on
    /// the old cell still receive its result.
    cell: Mutex<IndexCell>,

    loads: AtomicUsize,
}

impl FallbackLoader {
    pub fn new(source: impl FlatSource + 'static, config: FallbackConfig) -> Self {
        Self {
            source: Box::new(source),
            config,
            cell: Mutex::new(Arc::new(OnceCell::new())),
            loads: AtomicUsize::new(0),
        }
    }

    /// The built index, loading it if this is the first call.
    pub async fn ensure_loaded(&self) -> Result<Arc<RouteIndex>, LoadError> {
        let cell = self.current_cell();
        let index = cell.get_or_try_init(|| self.load()).await?;
        Ok(Arc::clone(index))
    }

    /// Drop the cached index. The next call to
    /// [`ensure_loaded`](Self::ensure_loaded) reloads from the source.
    pub fn invalidate(&self) {
        let mut cell = self.cell.lock().unwrap_or_else(PoisonError::into_inner);
        *cell = Arc::new(OnceCell::new());
        info!(source = %self.source.describe(), "fallback route index invalidated");
    }

    pub fn is_loaded(&self) -> bool {
        self.current_cell().initialized()
    }

    /// How many times the source has been read. Exposed for diagnostics.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Resolve `query` against the fallback index, loading it if needed.
    pub async fn resolve(&self, query: &RouteQuery) -> Result<Vec<ResolvedTrip>, LoadError> {
        let index = self.ensure_loaded().await?;
        Ok(resolve(&index, query))
    }

    fn current_cell(&self) -> IndexCell {
        let cell = self.cell.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&cell)
    }

    async fn load(&self) -> Result<Arc<RouteIndex>, LoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let source = self.source.describe();
        let started = Instant::now();
        info!(%source, "loading fallback route index");

        let timeout = self.config.load_timeout;
        let result = match tokio::time::timeout(timeout, self.read_and_build()).await {
            Ok(result) => result,
            Err(_) => Err(LoadError::Timeout(timeout)),
        };

        match result {
            Ok(index) => {
                info!(
                    %source,
                    trains = index.train_count(),
                    stations = index.station_count(),
                    stops = index.stop_count(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "fallback route index loaded"
                );
                Ok(Arc::new(index))
            }
            Err(e) => {
                warn!(%source, error = %e, "fallback route index load failed");
                Err(e)
            }
        }
    }

    async fn read_and_build(&self) -> Result<RouteIndex, LoadError> {
        let SourceRows { rows, unreadable } = self.source.read_rows().await?;

        let (index, mut report) =
            tokio::task::spawn_blocking(move || RouteIndex::build(rows)).await?;
        report.skipped += unreadable;

        info!(
            accepted = report.accepted,
            skipped = report.skipped,
            duplicates = report.duplicates,
            "built fallback route index"
        );
        Ok(index)
    }
}

impl std::fmt::Debug for FallbackLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackLoader")
            .field("source", &self.source.describe())
            .field("config", &self.config)
            .field("loads", &self.load_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::RawStopRow;
    use futures::FutureExt;
    use futures::future::{BoxFuture, join_all};
    use std::sync::atomic::AtomicBool;

    fn row(train: &str, seq: &str, station: &str, km: &str) -> RawStopRow {
        RawStopRow {
            train_no: Some(train.into()),
            sequence_no: Some(seq.into()),
            station_code: Some(station.into()),
            station_name: Some(station.into()),
            distance: Some(km.into()),
            ..Default::default()
        }
    }

    fn t1_rows() -> Vec<RawStopRow> {
        vec![
            row("T1", "1", "STN_A", "0"),
            row("T1", "2", "STN_B", "120"),
            row("T1", "3", "STN_C", "300"),
        ]
    }

    /// In-memory source with a configurable delay and failure switch.
    struct TestSource {
        rows: Vec<RawStopRow>,
        delay: Duration,
        fail: Arc<AtomicBool>,
    }

    impl TestSource {
        fn new(rows: Vec<RawStopRow>) -> Self {
            Self {
                rows,
                delay: Duration::ZERO,
                fail: Arc::new(AtomicBool::new(false)),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    impl FlatSource for TestSource {
        fn read_rows(&self) -> BoxFuture<'_, Result<SourceRows, LoadError>> {
            async move {
                tokio::time::sleep(self.delay).await;
                if self.fail.load(Ordering::SeqCst) {
                    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
                    return Err(LoadError::Ingest(crate::ingest::IngestError::Io {
                        path: "test.csv".into(),
                        source: err,
                    }));
                }
                Ok(SourceRows {
                    rows: self.rows.clone(),
                    unreadable: 0,
                })
            }
            .boxed()
        }

        fn describe(&self) -> String {
            "test source".into()
        }
    }

    #[tokio::test]
    async fn loads_once_and_resolves() {
        let loader = FallbackLoader::new(TestSource::new(t1_rows()), FallbackConfig::default());
        assert!(!loader.is_loaded());

        let query = RouteQuery::new("STN_A", "STN_C").unwrap();
        let trips = loader.resolve(&query).await.unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].distance_km, 300.0);

        let again = loader.resolve(&query).await.unwrap();
        assert_eq!(trips, again);
        assert_eq!(loader.load_count(), 1);
        assert!(loader.is_loaded());
    }

    #[tokio::test]
    async fn concurrent_first_callers_share_one_build() {
        let source = TestSource::new(t1_rows()).with_delay(Duration::from_millis(50));
        let loader = Arc::new(FallbackLoader::new(source, FallbackConfig::default()));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let loader = Arc::clone(&loader);
                tokio::spawn(async move { loader.ensure_loaded().await })
            })
            .collect();

        let indexes: Vec<_> = join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap().unwrap())
            .collect();

        assert_eq!(loader.load_count(), 1);
        assert!(indexes.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let loader = FallbackLoader::new(TestSource::new(t1_rows()), FallbackConfig::default());

        let first = loader.ensure_loaded().await.unwrap();
        loader.invalidate();
        assert!(!loader.is_loaded());
        let second = loader.ensure_loaded().await.unwrap();

        assert_eq!(loader.load_count(), 2);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let source = TestSource::new(t1_rows());
        let fail = Arc::clone(&source.fail);
        fail.store(true, Ordering::SeqCst);
        let loader = FallbackLoader::new(source, FallbackConfig::default());

        let err = loader.ensure_loaded().await.unwrap_err();
        assert!(matches!(err, LoadError::Ingest(_)));
        assert!(!loader.is_loaded());

        fail.store(false, Ordering::SeqCst);
        let index = loader.ensure_loaded().await.unwrap();
        assert_eq!(index.train_count(), 1);
        assert_eq!(loader.load_count(), 2);
    }

    #[tokio::test]
    async fn slow_source_times_out() {
        let source = TestSource::new(t1_rows()).with_delay(Duration::from_secs(5));
        let config = FallbackConfig::default().with_load_timeout(Duration::from_millis(20));
        let loader = FallbackLoader::new(source, config);

        let err = loader.ensure_loaded().await.unwrap_err();
        assert!(matches!(err, LoadError::Timeout(d) if d == Duration::from_millis(20)));
        assert!(!loader.is_loaded());
    }

    #[tokio::test]
    async fn empty_source_resolves_to_nothing() {
        let loader = FallbackLoader::new(TestSource::new(Vec::new()), FallbackConfig::default());
        let query = RouteQuery::new("STN_A", "STN_C").unwrap();

        assert!(loader.resolve(&query).await.unwrap().is_empty());
        assert!(loader.ensure_loaded().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_rows_are_skipped() {
        let mut rows = t1_rows();
        rows.push(RawStopRow {
            train_no: Some("T9".into()),
            ..Default::default()
        });
        let loader = FallbackLoader::new(TestSource::new(rows), FallbackConfig::default());

        let index = loader.ensure_loaded().await.unwrap();
        assert_eq!(index.train_count(), 1);
        assert_eq!(index.stop_count(), 3);
    }
}
