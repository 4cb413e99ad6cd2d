use serde::{Deserialize, Serialize};

use crate::{TaskRequirements, WorkerRecord};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRequest {
    #[serde(default)]
    pub worker_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub task_requirements: TaskRequirements,
    /// When present the prediction runs through the model instead of
    /// returning the placeholder estimate.
    #[serde(default)]
    pub worker: Option<WorkerRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceResponse {
    pub predicted_score: f64,
    pub confidence: f64,
    pub risk_factors: Vec<String>,
}
