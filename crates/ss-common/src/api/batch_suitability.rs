use serde::{Deserialize, Serialize};

use crate::{TaskRequirements, WorkerRecord};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSuitabilityRequest {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub task_requirements: TaskRequirements,
    #[serde(default)]
    pub workers: Vec<WorkerRecord>,
}

/// One entry per input worker, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerSuitability {
    pub worker_id: String,
    pub score: f64,
    pub confidence: f64,
    pub reasoning: String,
}
