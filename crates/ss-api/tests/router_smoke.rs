use axum::{body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_and_info_respond_with_model_status() {
    let app = ss_api::create_router(ss_api::test_state());

    let (status, health) = get_json(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["model_loaded"], true);
    assert_eq!(health["model"]["name"], "test-linear");

    let (status, info) = get_json(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["model_status"], "loaded");
    assert_eq!(info["endpoints"]["skill_gap"], "/api/analyze/skill-gap");
}

#[tokio::test]
async fn health_is_ok_without_model() {
    let app = ss_api::create_router(ss_api::test_state_without_model());

    let (status, health) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["model_loaded"], false);
    assert!(health.get("model").is_none());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = ss_api::create_router(ss_api::test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/predict/unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = ss_api::create_router(ss_api::test_state());

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/predict/best-worker")
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}
