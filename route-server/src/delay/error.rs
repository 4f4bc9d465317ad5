//! Delay prediction error types.

/// Errors from a delay predictor.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// HTTP request failed or timed out
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Prediction service returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not a usable prediction
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
