use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MISSING_DATA_MESSAGE: &str = "An internal error occurred due to missing data";
const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred while processing your request";

#[derive(Debug, Error, PartialEq, Clone)]
pub enum WeatherError {
    /// The request cannot be served with the configured ranges or formats.
    #[error("{0}")]
    InvalidArgument(String),
    /// A value the generator depends on was never set.
    #[error("missing data: {0}")]
    MissingData(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
}

/// A `WeatherError` together with the path of the request that caused it.
#[derive(Debug)]
pub struct ApiError {
    pub error: WeatherError,
    pub path: String,
}

impl ApiError {
    pub fn new(error: WeatherError, path: impl Into<String>) -> ApiError {
        ApiError {
            error,
            path: path.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Only invalid arguments are reported back verbatim, everything else
        // gets a fixed message so no internals end up in the body.
        let (status, message) = match self.error {
            WeatherError::InvalidArgument(message) => {
                warn!("Invalid argument provided to {}: {}", self.path, message);
                (StatusCode::BAD_REQUEST, message)
            }
            WeatherError::MissingData(detail) => {
                error!(
                    "Missing data while processing request to {}: {}",
                    self.path, detail
                );
                (StatusCode::INTERNAL_SERVER_ERROR, MISSING_DATA_MESSAGE.into())
            }
            WeatherError::Internal(detail) => {
                error!(
                    "Unexpected error while processing request to {}: {}",
                    self.path, detail
                );
                (StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_MESSAGE.into())
            }
        };
        let body = ErrorResponse {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or_default().to_string(),
            message,
            path: self.path,
        };
        (status, Json(body)).into_response()
    }
}
