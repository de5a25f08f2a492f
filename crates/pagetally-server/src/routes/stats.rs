use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use pagetally_core::store::TrackingStore;

use crate::{error::AppError, state::AppState};

/// `GET /stats/today` — today's per-path counters, busiest paths first.
///
/// Recomputed from the store on every call; the day boundary is UTC.
#[tracing::instrument(skip(state))]
pub async fn stats_today(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let Some(store) = state.store().await else {
        return Err(AppError::BackendUnavailable);
    };

    let day = chrono::Utc::now().date_naive();
    let rows = store.list_by_day(day).await.map_err(AppError::Internal)?;

    Ok(Json(json!({
        "day": day.to_string(),
        "rows": rows,
    })))
}
