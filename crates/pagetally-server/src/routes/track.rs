use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use pagetally_core::event::{Outcome, TrackPayload};
use pagetally_core::identity::UNKNOWN;

use crate::{error::AppError, state::AppState};

/// `POST /track` — ingest one page-visit event.
///
/// No auth: the tracking snippet runs on untrusted third-party pages.
/// The body carries `{visitorId, path, referrer?}`; identity comes from the
/// visitor token plus the `User-Agent` header, and the client IP is hashed
/// before it touches storage.
///
/// ## Response
/// - `204 No Content` — accepted, or suppressed as a repeat hit within the
///   dedupe window. The client cannot distinguish the two and has no need to.
/// - `400` — `visitorId` or `path` empty/absent.
/// - `503` — store not connected yet.
/// - `500` — store failed mid-pipeline; the event is dropped.
#[tracing::instrument(skip(state, headers, payload))]
pub async fn track(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<TrackPayload>,
) -> Result<impl IntoResponse, AppError> {
    let Some(pipeline) = state.pipeline().await else {
        return Err(AppError::BackendUnavailable);
    };

    let client_ip = extract_client_ip(&headers);
    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(UNKNOWN)
        .to_string();

    let outcome = pipeline
        .ingest(
            &payload.visitor_id,
            &payload.path,
            &user_agent,
            &client_ip,
            Utc::now(),
        )
        .await
        .map_err(AppError::TrackingFailed)?;

    match outcome {
        Outcome::Accepted | Outcome::SuppressedDuplicate => Ok(StatusCode::NO_CONTENT),
        Outcome::Rejected(_) => Err(AppError::MissingFields),
    }
}

/// Extract the real client IP from `X-Forwarded-For` (first entry).
///
/// Falls back to the fixed `"unknown"` sentinel when the header is absent,
/// so the stored ip_hash stays consistent for proxyless deployments.
fn extract_client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
