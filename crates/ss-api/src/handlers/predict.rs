use axum::{extract::rejection::JsonRejection, extract::State, Json};
use ss_common::api::batch_suitability::{BatchSuitabilityRequest, WorkerSuitability};
use ss_common::api::best_worker::{BestWorkerRequest, BestWorkerResponse};
use ss_common::api::performance::{PerformanceRequest, PerformanceResponse};
use ss_common::recommend::{self, RecommendError};
use ss_common::scoring::Scorer;
use ss_metrics::{record_prediction, record_worker_failure};
use tracing::info;

use crate::error::ApiError;
use crate::SharedState;

const BEST_WORKER: &str = "best_worker";
const BATCH_SUITABILITY: &str = "batch_suitability";
const PERFORMANCE: &str = "performance";

pub async fn best_worker(
    State(state): State<SharedState>,
    payload: Result<Json<BestWorkerRequest>, JsonRejection>,
) -> Result<Json<BestWorkerResponse>, ApiError> {
    let Json(request) = payload?;
    // An empty list is a client error even when no model is loaded.
    if request.available_workers.is_empty() {
        return Err(RecommendError::NoWorkers.into());
    }

    let scorer = Scorer::new(state.model()?);
    let outcome = recommend::recommend_best_worker(
        &scorer,
        &request.task_requirements,
        &request.available_workers,
    )
    .inspect_err(|_| record_worker_failure(BEST_WORKER, request.available_workers.len()))?;

    info!(
        task_id = request.task_id.as_deref().unwrap_or(""),
        workers = request.available_workers.len(),
        best_worker_id = %outcome.body.best_worker_id,
        failed_workers = outcome.failed_workers,
        "best worker predicted"
    );
    record_worker_failure(BEST_WORKER, outcome.failed_workers);
    record_prediction(BEST_WORKER);

    Ok(Json(outcome.body))
}

pub async fn batch_suitability(
    State(state): State<SharedState>,
    payload: Result<Json<BatchSuitabilityRequest>, JsonRejection>,
) -> Result<Json<Vec<WorkerSuitability>>, ApiError> {
    let Json(request) = payload?;
    if request.workers.is_empty() {
        return Err(RecommendError::NoWorkers.into());
    }

    let scorer = Scorer::new(state.model()?);
    let outcome =
        recommend::batch_suitability(&scorer, &request.task_requirements, &request.workers)?;

    info!(
        task_id = request.task_id.as_deref().unwrap_or(""),
        workers = request.workers.len(),
        failed_workers = outcome.failed_workers,
        "batch suitability predicted"
    );
    record_worker_failure(BATCH_SUITABILITY, outcome.failed_workers);
    record_prediction(BATCH_SUITABILITY);

    Ok(Json(outcome.body))
}

pub async fn performance(
    State(state): State<SharedState>,
    payload: Result<Json<PerformanceRequest>, JsonRejection>,
) -> Result<Json<PerformanceResponse>, ApiError> {
    let Json(request) = payload?;
    let model = state.model()?;

    let response = match &request.worker {
        Some(worker) => {
            recommend::predict_performance(&Scorer::new(model), worker, &request.task_requirements)?
        }
        None => recommend::placeholder_performance(),
    };

    info!(
        worker_id = request.worker_id.as_deref().unwrap_or(""),
        task_id = request.task_id.as_deref().unwrap_or(""),
        placeholder = request.worker.is_none(),
        "performance predicted"
    );
    record_prediction(PERFORMANCE);

    Ok(Json(response))
}
