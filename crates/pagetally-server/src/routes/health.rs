use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// `GET /` — liveness probe.
///
/// Always `200 OK` while the process lives; `database` reports whether the
/// store is attached and answering. Orchestrators probe this to tell "up
/// but waiting for the database" apart from "down".
///
/// Response shape:
/// ```json
/// { "status": "ok", "database": true, "version": "0.1.0" }
/// ```
#[tracing::instrument(skip(state))]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "database": state.is_ready().await,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
