//! Delay assessment: prediction, categorization and advice together.

use tracing::warn;

use super::assess::{DelayCategory, Suggestion, categorize, suggestions};
use super::cache::{CachedPredictor, PredictionCacheConfig};
use super::features::DelayFeatures;
use super::heuristic::heuristic_prediction;
use super::predictor::{DelayPredictor, Prediction};

/// Note attached to assessments that used the heuristic because the model
/// service failed.
pub const FALLBACK_NOTE: &str = "Using fallback prediction (ML service unavailable)";

/// A complete delay answer for one trip.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayAssessment {
    /// Whole minutes.
    pub predicted_delay: u32,
    pub category: DelayCategory,
    pub suggestions: Vec<Suggestion>,
    pub confidence: f64,
    pub note: Option<&'static str>,
}

impl DelayAssessment {
    fn from_prediction(
        prediction: Prediction,
        features: &DelayFeatures,
        note: Option<&'static str>,
    ) -> Self {
        let delay = prediction.delay_minutes;
        Self {
            predicted_delay: delay.max(0.0).round() as u32,
            category: categorize(delay),
            suggestions: suggestions(delay, features),
            confidence: prediction.confidence,
            note,
        }
    }
}

/// Predicts delays with the model service when configured, and the
/// heuristic otherwise.
pub struct DelayService {
    primary: Option<CachedPredictor>,
}

impl DelayService {
    /// `primary` is wrapped in a cache; pass `None` to always use the
    /// heuristic.
    pub fn new(primary: Option<Box<dyn DelayPredictor>>, cache: &PredictionCacheConfig) -> Self {
        Self {
            primary: primary.map(|p| CachedPredictor::new(p, cache)),
        }
    }

    pub fn heuristic_only() -> Self {
        Self { primary: None }
    }

    /// Assess one trip. Never fails: a model error degrades to the
    /// heuristic with [`FALLBACK_NOTE`].
    pub async fn assess(&self, features: &DelayFeatures) -> DelayAssessment {
        if let Some(primary) = &self.primary {
            match primary.predict(features).await {
                Ok(prediction) => return DelayAssessment::from_prediction(prediction, features, None),
                Err(e) => warn!(error = %e, "delay model unavailable, using heuristic"),
            }
        }

        let note = self.primary.as_ref().map(|_| FALLBACK_NOTE);
        DelayAssessment::from_prediction(heuristic_prediction(features), features, note)
    }
}

impl std::fmt::Debug for DelayService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelayService")
            .field("model", &self.primary.is_some())
            .finish()
    }
}
