use axum::{body::to_bytes, http::Request, http::StatusCode, Router};
use chrono::Utc;
use health_ingest_rs::{
    config::Config,
    routes,
    state::{AppState, NormalizedBatch},
};
use serde_json::Value;
use tower::ServiceExt;

fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::upload::router())
        .merge(routes::records::router())
        .with_state(state)
}

async fn health(state: AppState) -> Value {
    let response = app(state)
        .oneshot(
            Request::builder()
                .uri("/health")
                .method("GET")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json body")
}

#[tokio::test]
async fn health_returns_ok() {
    let json = health(AppState::new(Config::from_env())).await;

    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["cached_batches"], 0);
}

#[tokio::test]
async fn health_reports_cached_batches() {
    let state = AppState::new(Config::from_env());
    for id in ["a", "b"] {
        state.insert(
            id.to_string(),
            NormalizedBatch {
                user_id: "user1".to_string(),
                file_count: 0,
                records: Vec::new(),
                received_at: Utc::now(),
            },
        );
    }

    let json = health(state).await;

    assert_eq!(json["cached_batches"], 2);
}
