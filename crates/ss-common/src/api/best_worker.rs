use serde::{Deserialize, Serialize};

use crate::{TaskRequirements, WorkerRecord};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestWorkerRequest {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub task_requirements: TaskRequirements,
    #[serde(default)]
    pub available_workers: Vec<WorkerRecord>,
}

/// Ranked recommendation for one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestWorkerResponse {
    pub best_worker_id: String,
    /// Model confidence for the winning worker, in [0, 1].
    pub confidence: f64,
    pub reasoning: String,
    /// At most three runners-up, highest score first.
    pub alternative_workers: Vec<AlternativeWorker>,
    /// Hours; never below 70% of the nominal duration.
    pub predicted_completion_time: f64,
    /// Winner's score capped at 0.95.
    pub predicted_success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeWorker {
    pub worker_id: String,
    pub score: f64,
    pub reasoning: String,
}
