use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::skills::Skill;
use crate::{TaskRequirements, WorkerRecord};

/// Bumped whenever `FEATURE_NAMES` changes; model manifests must declare it.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

pub const FEATURE_COUNT: usize = 19;

/// Encode order shared with the trained model: 12 worker attributes followed
/// by 7 task attributes.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "performance_score",
    "skill_engine_assembly",
    "skill_painting_finishing",
    "skill_ev_battery_assembly",
    "skill_ckd_kitting",
    "skill_quality_inspection",
    "years_experience",
    "recent_accuracy_avg",
    "task_completion_time_avg",
    "rating_by_manager",
    "learning_agility",
    "suitability_score",
    "task_skill_engine_assembly",
    "task_skill_painting_finishing",
    "task_skill_ev_battery_assembly",
    "task_skill_ckd_kitting",
    "task_skill_quality_inspection",
    "task_complexity",
    "duration_hours",
];

/// Schema block embedded in a model manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub features: Vec<String>,
}

impl FeatureSchema {
    pub fn current() -> Self {
        Self {
            version: FEATURE_SCHEMA_VERSION,
            features: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// First position where this schema disagrees with the encoder, if any.
    pub fn first_mismatch(&self) -> Option<SchemaMismatch> {
        if self.version != FEATURE_SCHEMA_VERSION {
            return Some(SchemaMismatch::Version {
                expected: FEATURE_SCHEMA_VERSION,
                found: self.version,
            });
        }

        if self.features.len() != FEATURE_COUNT {
            return Some(SchemaMismatch::Length {
                expected: FEATURE_COUNT,
                found: self.features.len(),
            });
        }

        self.features
            .iter()
            .zip(FEATURE_NAMES.iter())
            .enumerate()
            .find(|(_, (found, expected))| found.as_str() != **expected)
            .map(|(position, (found, expected))| SchemaMismatch::Name {
                position,
                expected: *expected,
                found: found.clone(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaMismatch {
    #[error("schema version {found} does not match encoder version {expected}")]
    Version { expected: u32, found: u32 },
    #[error("schema lists {found} features, encoder produces {expected}")]
    Length { expected: usize, found: usize },
    #[error("feature #{position} is `{found}`, encoder expects `{expected}`")]
    Name {
        position: usize,
        expected: &'static str,
        found: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Value by schema name; used by tests and diagnostics.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|idx| self.0[idx])
    }
}

/// Map a worker/task pair onto the model's input vector. Absent values encode as 0.
pub fn encode(worker: &WorkerRecord, task: &TaskRequirements) -> FeatureVector {
    let mut values = [0.0; FEATURE_COUNT];
    let mut slot = 0;
    let mut push = |value: Option<f64>| {
        values[slot] = value.unwrap_or(0.0);
        slot += 1;
    };

    push(worker.performance_score);
    for skill in Skill::all() {
        push(worker.skill(skill));
    }
    push(worker.years_experience);
    push(worker.recent_accuracy_avg);
    push(worker.task_completion_time_avg);
    push(worker.rating_by_manager);
    push(worker.learning_agility);
    push(worker.suitability_score);

    for skill in Skill::all() {
        push(task.skill(skill));
    }
    push(task.task_complexity);
    push(task.duration_hours);

    FeatureVector(values)
}
