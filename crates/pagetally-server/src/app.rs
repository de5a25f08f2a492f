use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{routes, state::AppState};

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// Middleware is applied in outer-to-inner order (outermost runs first on
/// request, last on response):
///
/// 1. `TraceLayer` — structured request/response logging via `tracing`.
/// 2. `CorsLayer` — permissive CORS for the track endpoint (the snippet is
///    embedded on third-party sites; browsers need CORS headers).
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::health::health))
        .route("/track", post(routes::track::track))
        .route("/stats/today", get(routes::stats::stats_today))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
