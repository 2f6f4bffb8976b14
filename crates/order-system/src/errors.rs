//! Application error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reddio_pay::SdkError;
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinError;

/// Errors surfaced by the order service and its handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request input.
    #[error("{0}")]
    Validation(String),

    /// The requested order does not exist.
    #[error("{0}")]
    NotFound(String),

    /// SQLite or connection pool failure.
    #[error("database error: {0}")]
    Database(String),

    /// The payment service call failed.
    #[error("payment service error: {0}")]
    Payment(#[from] SdkError),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected failure, e.g. a panicked blocking task.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for order system operations
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// HTTP status reported for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Payment(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                "internal server error".to_string()
            }
            Self::Payment(err) => {
                tracing::warn!(error = %err, kind = err.label(), "payment service call failed");
                self.to_string()
            }
            Self::Validation(_) | Self::NotFound(_) => self.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ffi::ErrorCode;

        match err {
            rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
                Self::Database(format!("constraint violation (code {})", e.extended_code))
            }
            rusqlite::Error::SqliteFailure(e, _)
                if matches!(e.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) =>
            {
                Self::Database("database is busy".to_string())
            }
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        Self::Database(format!("connection pool: {err}"))
    }
}

/// Map a `spawn_blocking` join failure.
#[must_use]
pub fn map_join_error(err: JoinError) -> AppError {
    if err.is_cancelled() {
        AppError::Internal("blocking task cancelled".into())
    } else {
        AppError::Internal(format!("blocking task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_is_bad_request() {
        let (status, body) = body_json(AppError::Validation("Invalid order ID".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid order ID"}));
    }

    #[tokio::test]
    async fn payment_failure_is_bad_gateway() {
        let err = AppError::from(SdkError::Http { status: 500, message: "boom".into() });
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("boom"));
    }

    #[tokio::test]
    async fn database_details_are_not_exposed() {
        let (status, body) = body_json(AppError::Database("disk I/O error".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "internal server error"}));
    }

    #[test]
    fn no_rows_maps_to_database_error() {
        let err = AppError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, AppError::Database(_)));
    }
}
