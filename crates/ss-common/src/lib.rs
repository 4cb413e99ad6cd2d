pub mod api;
pub mod estimate;
pub mod explain;
pub mod features;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod recommend;
pub mod scoring;
pub mod skill_gap;
pub mod skills;

use serde::{Deserialize, Serialize};

use normalize::{lenient_f64, lenient_id};
use skills::Skill;

// Records exchanged with the scheduling application. Attribute keys keep the
// snake_case names the application stores them under.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub worker_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub performance_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub skill_engine_assembly: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub skill_painting_finishing: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub skill_ev_battery_assembly: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub skill_ckd_kitting: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub skill_quality_inspection: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub years_experience: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub recent_accuracy_avg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub task_completion_time_avg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating_by_manager: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub learning_agility: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub suitability_score: Option<f64>,
}

impl WorkerRecord {
    /// Proficiency for one skill dimension, `None` when not reported.
    pub fn skill(&self, skill: Skill) -> Option<f64> {
        match skill {
            Skill::EngineAssembly => self.skill_engine_assembly,
            Skill::PaintingFinishing => self.skill_painting_finishing,
            Skill::EvBatteryAssembly => self.skill_ev_battery_assembly,
            Skill::CkdKitting => self.skill_ckd_kitting,
            Skill::QualityInspection => self.skill_quality_inspection,
        }
    }

    pub fn id_or_unknown(&self) -> &str {
        self.worker_id.as_deref().unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRequirements {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub skill_engine_assembly: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub skill_painting_finishing: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub skill_ev_battery_assembly: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub skill_ckd_kitting: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub skill_quality_inspection: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub task_complexity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration_hours: Option<f64>,
    /// Accepted from clients but not part of the feature schema.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub urgency: Option<f64>,
}

impl TaskRequirements {
    /// Desired level for one skill dimension, `None` when not required.
    pub fn skill(&self, skill: Skill) -> Option<f64> {
        match skill {
            Skill::EngineAssembly => self.skill_engine_assembly,
            Skill::PaintingFinishing => self.skill_painting_finishing,
            Skill::EvBatteryAssembly => self.skill_ev_battery_assembly,
            Skill::CkdKitting => self.skill_ckd_kitting,
            Skill::QualityInspection => self.skill_quality_inspection,
        }
    }

    pub fn requires(&self, skill: Skill) -> bool {
        self.skill(skill).unwrap_or(0.0) > 0.0
    }
}
