//! Delay prediction for resolved trips.
//!
//! A remote model service is asked first; when it cannot answer, a fixed
//! additive heuristic stands in. Either way the figure is banded into a
//! [`DelayCategory`] and paired with traveller [`Suggestion`]s.

mod assess;
mod cache;
mod client;
mod error;
mod features;
mod heuristic;
mod predictor;
mod service;

pub use assess::{DelayCategory, Priority, Suggestion, SuggestionKind, categorize, suggestions};
pub use cache::{CachedPredictor, PredictionCacheConfig};
pub use client::{PredictionClient, PredictionClientConfig};
pub use error::PredictError;
pub use features::{Congestion, DayOfWeek, DelayFeatures, TimeOfDay, Weather};
pub use heuristic::{HEURISTIC_CONFIDENCE, HeuristicPredictor, heuristic_delay, heuristic_prediction};
pub use predictor::{DelayPredictor, Prediction};
pub use service::{DelayAssessment, DelayService, FALLBACK_NOTE};
