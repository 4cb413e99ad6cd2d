use axum::{extract::State, Json};
use ss_common::api::service_info::{HealthResponse, InfoResponse};

use crate::SharedState;

pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(
        state.model.as_deref().map(|model| model.info()),
    ))
}

pub async fn info(State(state): State<SharedState>) -> Json<InfoResponse> {
    Json(InfoResponse::new(
        env!("CARGO_PKG_VERSION"),
        state.model.is_some(),
    ))
}
