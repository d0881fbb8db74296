use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use factorlab_core::analysis::AnalyzerError;
use serde_json::json;

/// Unified error type for dashboard API responses.
#[derive(Debug)]
pub enum DashboardError {
    /// The form could not be turned into a valid request.
    BadRequest(String),
    /// The market-data provider failed.
    Upstream(String),
    Internal(String),
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "bad_request: {msg}"),
            Self::Upstream(msg) => write!(f, "upstream_error: {msg}"),
            Self::Internal(msg) => write!(f, "internal_error: {msg}"),
        }
    }
}

impl std::error::Error for DashboardError {}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        if status.is_server_error() {
            tracing::warn!(%status, error = %msg, "update failed");
        }

        (status, axum::Json(json!({ "error": msg }))).into_response()
    }
}

impl From<AnalyzerError> for DashboardError {
    fn from(e: AnalyzerError) -> Self {
        match e {
            e if e.is_caller_error() => Self::BadRequest(e.to_string()),
            AnalyzerError::Fetch(inner) => Self::Upstream(inner.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for DashboardError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Internal(format!("analysis task failed: {e}"))
    }
}
