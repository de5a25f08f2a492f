use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use pagetally_core::config::Config;
use pagetally_duckdb::DuckDbStore;
use pagetally_server::app::build_app;
use pagetally_server::state::AppState;

fn test_config() -> Config {
    Config {
        port: 0,
        data_dir: "/tmp/pagetally-test".to_string(),
        session_ttl_secs: 1800,
        dedupe_window_secs: 60,
        purge_interval_secs: 60,
        duckdb_memory_limit: "1GB".to_string(),
    }
}

async fn json_body(response: axum::http::Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse JSON")
}

fn probe() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .expect("build request")
}

#[tokio::test]
async fn probe_reports_ready_when_store_attached() {
    let store = DuckDbStore::open_in_memory(Duration::from_secs(1800), Duration::from_secs(60))
        .expect("in-memory DuckDB");
    let state = Arc::new(AppState::with_store(test_config(), store));
    let app = build_app(state);

    let response = app.oneshot(probe()).await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn probe_stays_200_while_store_is_missing() {
    let state = Arc::new(AppState::new(test_config()));
    let app = build_app(state);

    let response = app.oneshot(probe()).await.expect("request");
    // The process is alive; only the readiness flag reflects the store.
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], false);
}
