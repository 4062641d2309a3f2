use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors raised at the I/O edges: reading inputs, exporting reports,
/// configuration and server start-up. The aggregation layer never fails.
#[derive(Debug, Error)]
pub enum InsightsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("data file not found: {}", .0.display())]
    DataFileMissing(PathBuf),

    #[error("expected a JSON array of records")]
    NotAnArray,

    #[error("invalid configuration for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, InsightsError>;

impl InsightsError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            InsightsError::DataFileMissing(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for InsightsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_maps_to_not_found() {
        let err = InsightsError::DataFileMissing(PathBuf::from("data/gps.csv"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "data file not found: data/gps.csv");
    }

    #[test]
    fn other_errors_are_internal() {
        assert_eq!(
            InsightsError::NotAnArray.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
