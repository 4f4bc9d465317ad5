//! Rule-based delay estimate used when no model is reachable.

use futures::FutureExt;
use futures::future::BoxFuture;

use super::error::PredictError;
use super::features::{Congestion, DelayFeatures, Weather};
use super::predictor::{DelayPredictor, Prediction};
use crate::domain::TrainType;

/// Confidence reported for heuristic estimates.
pub const HEURISTIC_CONFIDENCE: f64 = 0.6;

/// Distance contributes at most this many minutes.
const MAX_DISTANCE_MINUTES: f64 = 15.0;

/// Additive estimate: a base per train type, plus weather, congestion and
/// one minute per 100 km (capped). Rounded to whole minutes.
pub fn heuristic_delay(features: &DelayFeatures) -> f64 {
    let base = match features.train_type {
        TrainType::Express => 10.0,
        TrainType::Superfast => 5.0,
        TrainType::Local => 15.0,
    };
    let weather = match features.weather {
        Weather::Clear => 0.0,
        Weather::Rainy => 8.0,
        Weather::Foggy => 12.0,
    };
    let congestion = match features.congestion {
        Congestion::Low => 0.0,
        Congestion::Medium => 5.0,
        Congestion::High => 10.0,
    };
    let distance = (features.distance_km.max(0.0) / 100.0).min(MAX_DISTANCE_MINUTES);

    (base + weather + congestion + distance).round()
}

/// [`heuristic_delay`] with the fixed heuristic confidence.
pub fn heuristic_prediction(features: &DelayFeatures) -> Prediction {
    Prediction {
        delay_minutes: heuristic_delay(features),
        confidence: HEURISTIC_CONFIDENCE,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPredictor;

impl DelayPredictor for HeuristicPredictor {
    fn predict<'a>(
        &'a self,
        features: &'a DelayFeatures,
    ) -> BoxFuture<'a, Result<Prediction, PredictError>> {
        futures::future::ready(Ok(heuristic_prediction(features))).boxed()
    }
}
