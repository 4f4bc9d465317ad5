//! The predictor seam.

use futures::future::BoxFuture;

use super::error::PredictError;
use super::features::DelayFeatures;

/// A raw prediction, before categorization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Expected delay in minutes. Never negative.
    pub delay_minutes: f64,

    /// Predictor's confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Something that can estimate a delay from trip features.
pub trait DelayPredictor: Send + Sync {
    fn predict<'a>(
        &'a self,
        features: &'a DelayFeatures,
    ) -> BoxFuture<'a, Result<Prediction, PredictError>>;
}
