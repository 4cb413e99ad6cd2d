use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ModelInfo;

pub const SERVICE_NAME: &str = "SkillSight AI ML Prediction Server";

/// Diagnostic payloads keep the snake_case keys operators already script against.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelInfo>,
}

impl HealthResponse {
    pub fn new(model: Option<&ModelInfo>) -> Self {
        Self {
            status: "healthy",
            model_loaded: model.is_some(),
            message: "ML API server is running",
            model: model.cloned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    pub message: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
    pub model_status: String,
}

impl InfoResponse {
    pub fn new(version: &str, model_loaded: bool) -> Self {
        let endpoints = [
            ("best_worker", "/api/predict/best-worker"),
            ("batch_suitability", "/api/predict/batch-suitability"),
            ("performance", "/api/predict/performance"),
            ("skill_gap", "/api/analyze/skill-gap"),
            ("health", "/health"),
        ]
        .into_iter()
        .map(|(name, path)| (name.to_string(), path.to_string()))
        .collect();

        Self {
            message: SERVICE_NAME.to_string(),
            version: version.to_string(),
            endpoints,
            model_status: if model_loaded { "loaded" } else { "not loaded" }.to_string(),
        }
    }
}
