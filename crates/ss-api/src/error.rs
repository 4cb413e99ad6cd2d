use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::{borrow::Cow, future::Future};
use thiserror::Error;
use tracing::error;

use ss_common::model::ModelLoadError;
use ss_common::recommend::RecommendError;
use ss_common::scoring::ScoringError;
use ss_common::skill_gap::SkillGapError;

tokio::task_local! {
    static REQUEST_ID: String;
}

pub const MODEL_NOT_LOADED: &str = "Model not loaded";

fn sanitize_message(message: &str) -> String {
    const MAX_LEN: usize = 240;

    let mut cleaned = message
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .map(|token| {
            if token.contains("://") {
                "[redacted-url]".to_string()
            } else if token.starts_with('/') || token.contains('\\') {
                "[redacted-path]".to_string()
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.len() > MAX_LEN {
        let mut cut = MAX_LEN;
        while !cleaned.is_char_boundary(cut) {
            cut -= 1;
        }
        cleaned.truncate(cut);
        cleaned.push('…');
    }

    if cleaned.trim().is_empty() {
        "unexpected error".to_string()
    } else {
        cleaned
    }
}

pub async fn with_request_id<Fut, T>(request_id: Option<String>, fut: Fut) -> T
where
    Fut: Future<Output = T>,
{
    if let Some(request_id) = request_id {
        REQUEST_ID.scope(request_id, fut).await
    } else {
        fut.await
    }
}

pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|value| value.clone()).ok()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("model unavailable")]
    ModelUnavailable,
    #[error("prediction failed: {0}")]
    Prediction(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("model load failed: {0}")]
    ModelLoad(#[from] ModelLoadError),
    #[error("internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let code = self.code();
        let request_id = current_request_id();

        error!(
            code,
            status = %status,
            request_id = request_id.as_deref().unwrap_or(""),
            error = %self,
            "api_error"
        );

        let body = Json(ErrorResponse {
            error: self.public_message().into_owned(),
            code,
            request_id,
        });

        (status, body).into_response()
    }
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
            ApiError::ModelUnavailable => "model_unavailable",
            ApiError::Prediction(_) => "prediction_failed",
            ApiError::Config(_) => "config_error",
            ApiError::ModelLoad(_) => "model_load_failed",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn public_message(&self) -> Cow<'static, str> {
        match self {
            ApiError::BadRequest(msg) => Cow::Owned(sanitize_message(msg)),
            ApiError::PayloadTooLarge(_) => Cow::Borrowed("request body too large"),
            ApiError::ModelUnavailable => Cow::Borrowed(MODEL_NOT_LOADED),
            ApiError::Prediction(msg) => Cow::Owned(sanitize_message(msg)),
            ApiError::Config(_) | ApiError::ModelLoad(_) | ApiError::Internal(_) => {
                Cow::Borrowed("internal server error")
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ModelUnavailable
            | ApiError::Prediction(_)
            | ApiError::Config(_)
            | ApiError::ModelLoad(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        if value.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(value.body_text())
        } else {
            ApiError::BadRequest(value.body_text())
        }
    }
}

impl From<RecommendError> for ApiError {
    fn from(value: RecommendError) -> Self {
        match value {
            RecommendError::NoWorkers => ApiError::BadRequest(value.to_string()),
            RecommendError::NoWorkerScored { .. } => ApiError::Prediction(value.to_string()),
        }
    }
}

impl From<ScoringError> for ApiError {
    fn from(value: ScoringError) -> Self {
        ApiError::Prediction(value.to_string())
    }
}

impl From<SkillGapError> for ApiError {
    fn from(value: SkillGapError) -> Self {
        ApiError::BadRequest(value.to_string())
    }
}
