//! Caching layer for model predictions.
//!
//! Searches ask for one prediction per train, and the same handful of
//! (distance, conditions) combinations recur across searches. Distance is
//! bucketed to a tenth of a kilometre to keep keys hashable and bounded.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use moka::future::Cache as MokaCache;

use super::error::PredictError;
use super::features::{Congestion, DayOfWeek, DelayFeatures, TimeOfDay, Weather};
use super::predictor::{DelayPredictor, Prediction};
use crate::domain::TrainType;

/// Cache key: features with distance in tenths of a kilometre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FeatureKey {
    distance_tenths: u64,
    weather: Weather,
    day_of_week: DayOfWeek,
    time_of_day: TimeOfDay,
    train_type: TrainType,
    congestion: Congestion,
}

impl From<&DelayFeatures> for FeatureKey {
    fn from(f: &DelayFeatures) -> Self {
        Self {
            distance_tenths: (f.distance_km.max(0.0) * 10.0).round() as u64,
            weather: f.weather,
            day_of_week: f.day_of_week,
            time_of_day: f.time_of_day,
            train_type: f.train_type,
            congestion: f.congestion,
        }
    }
}

/// Configuration for the prediction cache.
#[derive(Debug, Clone)]
pub struct PredictionCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for PredictionCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

/// A predictor with a cache in front of it.
///
/// Only successful predictions are cached; a failure is retried on the
/// next call.
pub struct CachedPredictor {
    inner: Box<dyn DelayPredictor>,
    cache: MokaCache<FeatureKey, Prediction>,
}

impl CachedPredictor {
    pub fn new(inner: Box<dyn DelayPredictor>, config: &PredictionCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, cache }
    }

    /// Get a prediction, using the cache if available.
    pub async fn cached_predict(&self, features: &DelayFeatures) -> Result<Prediction, PredictError> {
        let key = FeatureKey::from(features);

        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }

        let prediction = self.inner.predict(features).await?;
        self.cache.insert(key, prediction).await;
        Ok(prediction)
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl DelayPredictor for CachedPredictor {
    fn predict<'a>(
        &'a self,
        features: &'a DelayFeatures,
    ) -> BoxFuture<'a, Result<Prediction, PredictError>> {
        self.cached_predict(features).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls; fails while `failing` is set.
    struct CountingPredictor {
        calls: Arc<AtomicUsize>,
        failing: bool,
    }

    impl DelayPredictor for CountingPredictor {
        fn predict<'a>(
            &'a self,
            features: &'a DelayFeatures,
        ) -> BoxFuture<'a, Result<Prediction, PredictError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = if self.failing {
                Err(PredictError::Api {
                    status: 503,
                    message: "down".into(),
                })
            } else {
                Ok(Prediction {
                    delay_minutes: features.distance_km / 10.0,
                    confidence: 0.85,
                })
            };
            futures::future::ready(result).boxed()
        }
    }

    fn features(km: f64) -> DelayFeatures {
        DelayFeatures {
            distance_km: km,
            weather: Weather::Clear,
            day_of_week: DayOfWeek::Monday,
            time_of_day: TimeOfDay::Morning,
            train_type: TrainType::Express,
            congestion: Congestion::Medium,
        }
    }

    fn cached(failing: bool) -> (CachedPredictor, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let inner = CountingPredictor {
            calls: Arc::clone(&calls),
            failing,
        };
        (
            CachedPredictor::new(Box::new(inner), &PredictionCacheConfig::default()),
            calls,
        )
    }

    #[test]
    fn default_config() {
        let config = PredictionCacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 1000);
    }

    #[test]
    fn key_buckets_distance_to_tenths() {
        assert_eq!(FeatureKey::from(&features(100.04)), FeatureKey::from(&features(100.0)));
        assert_ne!(FeatureKey::from(&features(100.1)), FeatureKey::from(&features(100.0)));
    }

    #[tokio::test]
    async fn repeated_features_hit_cache() {
        let (predictor, calls) = cached(false);

        let a = predictor.predict(&features(200.0)).await.unwrap();
        let b = predictor.predict(&features(200.0)).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        predictor.predict(&features(300.0)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let (predictor, calls) = cached(true);

        assert!(predictor.predict(&features(200.0)).await.is_err());
        assert!(predictor.predict(&features(200.0)).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_clears_entries() {
        let (predictor, calls) = cached(false);

        predictor.predict(&features(50.0)).await.unwrap();
        predictor.invalidate_all();
        predictor.predict(&features(50.0)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
