use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level errors that map directly to HTTP responses.
///
/// Every variant implements [`IntoResponse`] so Axum handlers can use
/// `Result<impl IntoResponse, AppError>` as their return type. The caller
/// never learns which internal stage failed — only the distinction between
/// client error, backend not ready, and opaque failure.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing required fields")]
    MissingFields,

    #[error("backend unavailable")]
    BackendUnavailable,

    /// A store error surfaced by the ingestion pipeline. The event is
    /// dropped — no queueing, no retry.
    #[error("tracking failed: {0}")]
    TrackingFailed(anyhow::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MissingFields => (
                StatusCode::BAD_REQUEST,
                "visitorId and path are required",
            ),
            AppError::BackendUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Database not connected yet",
            ),
            AppError::TrackingFailed(e) => {
                tracing::error!(error = %e, "Tracking failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Tracking failed")
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use http_body_util::BodyExt;
    use serde_json::Value;

    use super::*;

    async fn response_parts(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        (status, serde_json::from_slice(&bytes).expect("parse JSON"))
    }

    #[tokio::test]
    async fn missing_fields_maps_to_400_with_wire_body() {
        let (status, body) = response_parts(AppError::MissingFields).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "visitorId and path are required");
    }

    #[tokio::test]
    async fn backend_unavailable_maps_to_503_with_wire_body() {
        let (status, body) = response_parts(AppError::BackendUnavailable).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Database not connected yet");
    }

    #[tokio::test]
    async fn tracking_failure_maps_to_opaque_500() {
        let (status, body) =
            response_parts(AppError::TrackingFailed(anyhow!("connection reset"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Tracking failed");
        // The failing stage must never leak to the caller.
        assert!(!body.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn internal_error_maps_to_opaque_500() {
        let (status, body) = response_parts(AppError::Internal(anyhow!("disk full"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(!body.to_string().contains("disk full"));
    }
}
