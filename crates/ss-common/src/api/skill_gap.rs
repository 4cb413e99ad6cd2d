use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::WorkerRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGapRequest {
    #[serde(default)]
    pub worker_id: Option<String>,
    /// Skill key → required level. Insertion order is preserved in the response.
    #[serde(default)]
    pub target_skills: Map<String, Value>,
    #[serde(default)]
    pub worker: Option<WorkerRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGap {
    pub skill: String,
    pub current_level: f64,
    pub required_level: f64,
    pub gap: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRecommendation {
    pub skill: String,
    pub priority: TrainingPriority,
    pub estimated_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGapResponse {
    pub gaps: Vec<SkillGap>,
    pub recommended_training: Vec<TrainingRecommendation>,
}
