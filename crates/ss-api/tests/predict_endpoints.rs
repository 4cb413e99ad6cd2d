use axum::{body::Body, http::Request, http::StatusCode, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn post(app: Router, uri: &str, body: Body) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .header("x-request-id", "test-req")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post(app, uri, Body::from(body.to_string())).await
}

fn app() -> Router {
    ss_api::create_router(ss_api::test_state())
}

#[tokio::test]
async fn best_worker_ranks_and_caps_alternatives() {
    let (status, body) = post_json(
        app(),
        "/api/predict/best-worker",
        json!({
            "taskId": "T-1",
            "taskRequirements": {"duration_hours": 8, "task_complexity": 0.8},
            "availableWorkers": [
                {"worker_id": "W1", "performance_score": 55},
                {"worker_id": "W2", "performance_score": 92, "task_completion_time_avg": 0.3},
                {"worker_id": 3, "performance_score": "70"},
                {"worker_id": "W4", "performance_score": 60},
                {"worker_id": "W5", "performance_score": 80}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bestWorkerId"], "W2");
    assert_eq!(body["reasoning"], "High performance score (92.0%).");
    assert!((body["predictedCompletionTime"].as_f64().unwrap() - 9.52).abs() < 1e-9);
    assert!((body["predictedSuccessRate"].as_f64().unwrap() - 0.92).abs() < 1e-9);

    let alternatives = body["alternativeWorkers"].as_array().unwrap();
    let ids: Vec<&str> = alternatives
        .iter()
        .map(|alt| alt["workerId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["W5", "3", "W4"]);
}

#[tokio::test]
async fn best_worker_success_rate_is_capped() {
    let (_, body) = post_json(
        app(),
        "/api/predict/best-worker",
        json!({
            "taskRequirements": {},
            "availableWorkers": [{"worker_id": "W1", "performance_score": 100}]
        }),
    )
    .await;

    assert_eq!(body["confidence"], 1.0);
    assert_eq!(body["predictedSuccessRate"], 0.95);
    assert_eq!(body["alternativeWorkers"], json!([]));
}

#[tokio::test]
async fn best_worker_empty_list_is_bad_request_even_without_model() {
    let app = ss_api::create_router(ss_api::test_state_without_model());
    let (status, body) = post_json(
        app,
        "/api/predict/best-worker",
        json!({"taskRequirements": {}, "availableWorkers": []}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No workers provided");
    assert_eq!(body["request_id"], "test-req");
}

#[tokio::test]
async fn best_worker_without_model_is_server_error() {
    let app = ss_api::create_router(ss_api::test_state_without_model());
    let (status, body) = post_json(
        app,
        "/api/predict/best-worker",
        json!({"taskRequirements": {}, "availableWorkers": [{"worker_id": "W1"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Model not loaded");
}

#[tokio::test]
async fn best_worker_with_no_scorable_worker_is_server_error() {
    let (status, body) = post_json(
        app(),
        "/api/predict/best-worker",
        json!({"taskRequirements": {}, "availableWorkers": [{"performance_score": 90}]}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "prediction_failed");
}

#[tokio::test]
async fn batch_returns_one_entry_per_worker_with_fallback() {
    let (status, body) = post_json(
        app(),
        "/api/predict/batch-suitability",
        json!({
            "taskRequirements": {"skill_engine_assembly": 0.5},
            "workers": [
                {"worker_id": "W1", "performance_score": 85, "skill_engine_assembly": 0.9},
                {"performance_score": 70},
                {"worker_id": "W3", "performance_score": null}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 3);

    assert_eq!(results[0]["workerId"], "W1");
    assert_eq!(
        results[0]["reasoning"],
        "Good performance score (85.0%). Strong skills in: Engine Assembly (90%)."
    );

    assert_eq!(results[1]["workerId"], "unknown");
    assert_eq!(results[1]["score"], 0.5);
    assert_eq!(results[1]["confidence"], 0.3);
    assert_eq!(
        results[1]["reasoning"],
        "Fallback scoring due to prediction error"
    );

    assert_eq!(results[2]["workerId"], "W3");
    assert_eq!(results[2]["score"], 0.0);
}

#[tokio::test]
async fn batch_empty_list_is_bad_request() {
    let (status, _) = post_json(
        app(),
        "/api/predict/batch-suitability",
        json!({"taskRequirements": {}, "workers": []}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn performance_placeholder_and_model_paths() {
    let (status, placeholder) = post_json(
        app(),
        "/api/predict/performance",
        json!({"workerId": "W1", "taskId": "T1", "taskRequirements": {}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(placeholder["predictedScore"], 0.85);
    assert_eq!(placeholder["confidence"], 0.78);
    assert_eq!(placeholder["riskFactors"].as_array().unwrap().len(), 2);

    let (status, scored) = post_json(
        app(),
        "/api/predict/performance",
        json!({
            "workerId": "W1",
            "taskRequirements": {"task_complexity": 0.9, "skill_ckd_kitting": 0.8},
            "worker": {
                "worker_id": "W1",
                "performance_score": 60,
                "years_experience": 4,
                "skill_ckd_kitting": 0.5,
                "recent_accuracy_avg": 0.8
            }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!((scored["predictedScore"].as_f64().unwrap() - 0.6).abs() < 1e-9);
    assert_eq!(
        scored["riskFactors"],
        json!([
            "Task complexity is high",
            "CKD Kitting proficiency 50% below required 80%",
            "Recent accuracy 80.0% below target"
        ])
    );
}

#[tokio::test]
async fn skill_gap_preserves_request_order() {
    let (status, body) = post_json(
        app(),
        "/api/analyze/skill-gap",
        json!({
            "workerId": "W1",
            "targetSkills": {"skill_quality_inspection": 0.9, "skill_engine_assembly": 0.6}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gaps"][0]["skill"], "skill_quality_inspection");
    assert_eq!(body["gaps"][0]["currentLevel"], 0.7);
    assert_eq!(body["gaps"][1]["skill"], "skill_engine_assembly");
    assert_eq!(
        body["recommendedTraining"],
        json!([{"skill": "Advanced Technical Skills", "priority": "High", "estimatedHours": 12}])
    );
}

#[tokio::test]
async fn skill_gap_works_without_model() {
    let app = ss_api::create_router(ss_api::test_state_without_model());
    let (status, _) = post_json(
        app,
        "/api/analyze/skill-gap",
        json!({"workerId": "W1", "targetSkills": {"skill_ckd_kitting": 0.5}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (status, body) = post(
        app(),
        "/api/predict/batch-suitability",
        Body::from("{\"workers\": ["),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let padding = "x".repeat(ss_api::MAX_BODY_BYTES + 1);
    let (status, _) = post(
        app(),
        "/api/analyze/skill-gap",
        Body::from(format!("{{\"workerId\": \"{padding}\"}}")),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
