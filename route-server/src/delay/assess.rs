//! Turning a delay figure into a category and traveller advice.

use serde::Serialize;

use super::features::{Congestion, DelayFeatures, Weather};
use crate::domain::TrainType;

/// Severity band for a predicted delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DelayCategory {
    Minimal,
    Minor,
    Moderate,
    Significant,
    Severe,
}

/// Band a delay in minutes: up to 5 minimal, 15 minor, 30 moderate,
/// 60 significant, anything longer severe.
pub fn categorize(delay_minutes: f64) -> DelayCategory {
    if delay_minutes <= 5.0 {
        DelayCategory::Minimal
    } else if delay_minutes <= 15.0 {
        DelayCategory::Minor
    } else if delay_minutes <= 30.0 {
        DelayCategory::Moderate
    } else if delay_minutes <= 60.0 {
        DelayCategory::Significant
    } else {
        DelayCategory::Severe
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Warning,
    Info,
    Suggestion,
    Success,
    Alternative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// One piece of advice shown alongside a prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub message: String,
    pub priority: Priority,
}

impl Suggestion {
    fn new(kind: SuggestionKind, message: impl Into<String>, priority: Priority) -> Self {
        Self {
            kind,
            message: message.into(),
            priority,
        }
    }
}

/// Advice for a predicted delay under the given conditions, most urgent
/// rules first.
pub fn suggestions(delay_minutes: f64, features: &DelayFeatures) -> Vec<Suggestion> {
    let mut out = Vec::new();

    if delay_minutes > 30.0 {
        out.push(Suggestion::new(
            SuggestionKind::Warning,
            format!(
                "Expected delay of {} minutes. Consider booking alternative trains or adjusting your schedule.",
                delay_minutes.round()
            ),
            Priority::High,
        ));
    }

    if matches!(features.weather, Weather::Rainy | Weather::Foggy) {
        out.push(Suggestion::new(
            SuggestionKind::Info,
            format!(
                "Weather conditions ({}) may cause additional delays. Plan for extra travel time.",
                features.weather
            ),
            Priority::Medium,
        ));
    }

    if features.congestion == Congestion::High {
        out.push(Suggestion::new(
            SuggestionKind::Info,
            "High route congestion detected. Consider traveling during off-peak hours for better punctuality.",
            Priority::Medium,
        ));
    }

    if features.train_type == TrainType::Superfast && delay_minutes > 15.0 {
        out.push(Suggestion::new(
            SuggestionKind::Suggestion,
            "Superfast trains typically have better punctuality. Current delay is unusual - check for service updates.",
            Priority::Medium,
        ));
    }

    if delay_minutes <= 10.0 {
        out.push(Suggestion::new(
            SuggestionKind::Success,
            "Train is expected to run on time with minimal delays. Safe to proceed with your travel plans.",
            Priority::Low,
        ));
    }

    if delay_minutes > 20.0 {
        out.push(Suggestion::new(
            SuggestionKind::Alternative,
            "Consider booking trains with earlier departure times to account for potential delays.",
            Priority::High,
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::features::{DayOfWeek, TimeOfDay};

    fn features(weather: Weather, congestion: Congestion, train_type: TrainType) -> DelayFeatures {
        DelayFeatures {
            distance_km: 300.0,
            weather,
            day_of_week: DayOfWeek::Tuesday,
            time_of_day: TimeOfDay::Morning,
            train_type,
            congestion,
        }
    }

    fn kinds(s: &[Suggestion]) -> Vec<SuggestionKind> {
        s.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn category_bands() {
        assert_eq!(categorize(0.0), DelayCategory::Minimal);
        assert_eq!(categorize(5.0), DelayCategory::Minimal);
        assert_eq!(categorize(5.5), DelayCategory::Minor);
        assert_eq!(categorize(15.0), DelayCategory::Minor);
        assert_eq!(categorize(30.0), DelayCategory::Moderate);
        assert_eq!(categorize(60.0), DelayCategory::Significant);
        assert_eq!(categorize(61.0), DelayCategory::Severe);
    }

    #[test]
    fn on_time_in_good_conditions() {
        let f = features(Weather::Clear, Congestion::Low, TrainType::Express);
        let s = suggestions(8.0, &f);
        assert_eq!(kinds(&s), [SuggestionKind::Success]);
        assert_eq!(s[0].priority, Priority::Low);
    }

    #[test]
    fn long_delay_in_bad_conditions() {
        let f = features(Weather::Foggy, Congestion::High, TrainType::Superfast);
        let s = suggestions(42.0, &f);

        assert_eq!(
            kinds(&s),
            [
                SuggestionKind::Warning,
                SuggestionKind::Info,
                SuggestionKind::Info,
                SuggestionKind::Suggestion,
                SuggestionKind::Alternative,
            ]
        );
        assert_eq!(
            s[0].message,
            "Expected delay of 42 minutes. Consider booking alternative trains or adjusting your schedule."
        );
        assert!(s[1].message.contains("(Foggy)"));
    }

    #[test]
    fn middle_band_has_no_success_or_warning() {
        let f = features(Weather::Clear, Congestion::Medium, TrainType::Local);
        assert!(suggestions(14.0, &f).is_empty());
        assert_eq!(kinds(&suggestions(25.0, &f)), [SuggestionKind::Alternative]);
    }

    #[test]
    fn serializes_like_the_api() {
        let s = Suggestion::new(SuggestionKind::Alternative, "x", Priority::High);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "alternative", "message": "x", "priority": "high" })
        );
        assert_eq!(
            serde_json::to_string(&DelayCategory::Significant).unwrap(),
            "\"Significant\""
        );
    }
}
