//! Client for the delay prediction model service.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::error::PredictError;
use super::features::{Congestion, DayOfWeek, DelayFeatures, TimeOfDay, Weather};
use super::predictor::{DelayPredictor, Prediction};
use crate::domain::TrainType;

/// Default base URL for the model service.
const DEFAULT_BASE_URL: &str = "http://localhost:5001";

/// Confidence assumed when the service does not report one.
const DEFAULT_CONFIDENCE: f64 = 0.85;

/// Request body for `POST /predict`.
#[derive(Debug, Serialize)]
struct PredictRequest {
    distance: f64,
    weather_conditions: Weather,
    day_of_week: DayOfWeek,
    time_of_day: TimeOfDay,
    train_type: TrainType,
    route_congestion: Congestion,
}

impl From<&DelayFeatures> for PredictRequest {
    fn from(f: &DelayFeatures) -> Self {
        Self {
            distance: f.distance_km,
            weather_conditions: f.weather,
            day_of_week: f.day_of_week,
            time_of_day: f.time_of_day,
            train_type: f.train_type,
            route_congestion: f.congestion,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    predicted_delay: f64,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Configuration for the prediction client.
#[derive(Debug, Clone)]
pub struct PredictionClientConfig {
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PredictionClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 5,
        }
    }
}

impl PredictionClientConfig {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP client for the model service.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    base_url: String,
}

impl PredictionClient {
    pub fn new(config: PredictionClientConfig) -> Result<Self, PredictError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Ask the service for a prediction.
    pub async fn fetch_prediction(
        &self,
        features: &DelayFeatures,
    ) -> Result<Prediction, PredictError> {
        let url = format!("{}/predict", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&PredictRequest::from(features))
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PredictError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let parsed: PredictResponse =
            serde_json::from_str(&body).map_err(|e| PredictError::Json {
                message: e.to_string(),
            })?;

        if !parsed.predicted_delay.is_finite() {
            return Err(PredictError::Json {
                message: "predicted_delay is not a finite number".to_string(),
            });
        }

        Ok(Prediction {
            delay_minutes: parsed.predicted_delay.max(0.0),
            confidence: parsed.confidence.unwrap_or(DEFAULT_CONFIDENCE),
        })
    }
}

impl DelayPredictor for PredictionClient {
    fn predict<'a>(
        &'a self,
        features: &'a DelayFeatures,
    ) -> BoxFuture<'a, Result<Prediction, PredictError>> {
        self.fetch_prediction(features).boxed()
    }
}
