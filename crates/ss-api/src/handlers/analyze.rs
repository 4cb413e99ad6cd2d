use axum::{extract::rejection::JsonRejection, Json};
use ss_common::api::skill_gap::{SkillGapRequest, SkillGapResponse};
use ss_common::skill_gap::analyze_skill_gaps;
use ss_metrics::record_prediction;
use tracing::info;

use crate::error::ApiError;

const SKILL_GAP: &str = "skill_gap";

/// Gap analysis is rule-based and does not consult the model.
pub async fn skill_gap(
    payload: Result<Json<SkillGapRequest>, JsonRejection>,
) -> Result<Json<SkillGapResponse>, ApiError> {
    let Json(request) = payload?;
    let response = analyze_skill_gaps(&request.target_skills, request.worker.as_ref())?;

    info!(
        worker_id = request.worker_id.as_deref().unwrap_or(""),
        skills = response.gaps.len(),
        "skill gaps analyzed"
    );
    record_prediction(SKILL_GAP);

    Ok(Json(response))
}
