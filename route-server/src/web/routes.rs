//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{Datelike, Local, NaiveDate, Timelike};
use futures::future::join_all;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::delay::{Congestion, DayOfWeek, DelayFeatures, TimeOfDay, Weather};
use crate::domain::TrainId;
use crate::resolver::ResolvedTrip;
use crate::search::SearchError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/trains/search", get(search_trains))
        .route("/api/trains/stations", get(list_stations))
        .route("/api/trains/:train_no", get(train_details))
        .route("/api/delays/predict", post(predict_delay))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Route server is running",
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| AppError::BadRequest {
        message: format!("Invalid date: {raw} (expected YYYY-MM-DD)"),
    })
}

/// Features for one trip. Time of day comes from the boarding time, or
/// the current time when the timetable has none.
fn trip_features(
    trip: &ResolvedTrip,
    weather: Weather,
    congestion: Congestion,
    day_of_week: DayOfWeek,
) -> DelayFeatures {
    let time_of_day = trip
        .source_stop
        .boarding_time()
        .map(TimeOfDay::from_clock)
        .unwrap_or_else(|| TimeOfDay::from_hour(Local::now().hour()));

    DelayFeatures {
        distance_km: trip.distance_km,
        weather,
        day_of_week,
        time_of_day,
        train_type: trip.train_type,
        congestion,
    }
}

/// Search for trains between two stations, each with a delay prediction.
async fn search_trains(
    State(state): State<AppState>,
    query: Result<Query<SearchRequest>, QueryRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Query(req) = query.map_err(|e| AppError::BadRequest {
        message: e.body_text(),
    })?;

    let (Some(source), Some(destination)) = (non_blank(req.source), non_blank(req.destination))
    else {
        return Err(AppError::BadRequest {
            message: "Source and destination stations are required".to_string(),
        });
    };

    let date = req.date.as_deref().map(parse_date).transpose()?;
    let day_of_week = DayOfWeek::from(date.unwrap_or_else(|| Local::now().date_naive()).weekday());
    let weather = req.weather.unwrap_or_default();
    let congestion = req.congestion.unwrap_or_default();

    let outcome = state.search.search(&source, &destination).await?;

    let trains = join_all(outcome.trips.iter().map(|trip| {
        let delays = &state.delays;
        async move {
            let features = trip_features(trip, weather, congestion, day_of_week);
            let assessment = delays.assess(&features).await;
            TrainResult::from_trip(trip, assessment)
        }
    }))
    .await;

    let message = trains
        .is_empty()
        .then(|| "No trains found for the given route".to_string());

    Ok(Json(SearchResponse {
        count: trains.len(),
        trains,
        search_params: SearchParams {
            source,
            destination,
            date: date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "Not specified".to_string()),
            weather,
            congestion,
        },
        source: outcome.source.as_str(),
        message,
    }))
}

/// List every station for autocomplete.
async fn list_stations(State(state): State<AppState>) -> Result<Json<StationsResponse>, AppError> {
    let stations = state.search.stations().await?;
    Ok(Json(StationsResponse {
        stations: stations.into_iter().map(StationResult::from).collect(),
    }))
}

/// Full route of one train.
async fn train_details(
    State(state): State<AppState>,
    Path(train_no): Path<String>,
) -> Result<Json<TrainDetailResponse>, AppError> {
    let train = TrainId::parse(&train_no).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let stops = state.search.train(&train).await?.unwrap_or_default();
    let detail = TrainDetailResponse::from_stops(&stops).ok_or_else(|| AppError::NotFound {
        message: "Train not found".to_string(),
    })?;

    Ok(Json(detail))
}

/// Predict the delay for an arbitrary set of features.
async fn predict_delay(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, AppError> {
    let Json(req) = body.map_err(|e| AppError::BadRequest {
        message: format!("All prediction parameters are required: {}", e.body_text()),
    })?;

    if !(req.distance.is_finite() && req.distance > 0.0) {
        return Err(AppError::BadRequest {
            message: "All prediction parameters are required: distance must be positive"
                .to_string(),
        });
    }

    let features = DelayFeatures {
        distance_km: req.distance,
        weather: req.weather_conditions,
        day_of_week: req.day_of_week,
        time_of_day: req.time_of_day,
        train_type: req.train_type,
        congestion: req.route_congestion,
    };

    let assessment = state.delays.assess(&features).await;
    Ok(Json(assessment.into()))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidInput(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            SearchError::Fallback(source) => {
                error!(error = %source, "fallback train data could not be loaded");
                AppError::Unavailable {
                    message: "train data unavailable".to_string(),
                }
            }
            SearchError::Store(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
