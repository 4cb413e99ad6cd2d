use std::cmp::Ordering;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::api::skill_gap::{SkillGap, SkillGapResponse, TrainingPriority, TrainingRecommendation};
use crate::normalize::coerce_f64;
use crate::skills::Skill;
use crate::WorkerRecord;

/// Assumed proficiency when the caller does not supply a worker record.
pub const PLACEHOLDER_CURRENT_LEVEL: f64 = 0.7;

const HOURS_PER_LEVEL: f64 = 40.0;
const HIGH_PRIORITY_GAP: f64 = 0.3;
const MEDIUM_PRIORITY_GAP: f64 = 0.15;

#[derive(Debug, Error, PartialEq)]
pub enum SkillGapError {
    #[error("targetSkills.{0} must be numeric")]
    NonNumericTarget(String),
}

/// Gap per requested skill, in request order.
///
/// Without a worker record every skill is compared against
/// `PLACEHOLDER_CURRENT_LEVEL` and a single generic training entry is
/// returned. With one, known skill keys use the worker's proficiency and
/// training is recommended per positive gap.
pub fn analyze_skill_gaps(
    target_skills: &Map<String, Value>,
    worker: Option<&WorkerRecord>,
) -> Result<SkillGapResponse, SkillGapError> {
    let mut gaps = Vec::with_capacity(target_skills.len());

    for (skill, level) in target_skills {
        let required_level =
            coerce_f64(level).ok_or_else(|| SkillGapError::NonNumericTarget(skill.clone()))?;
        let current_level = worker
            .and_then(|w| Skill::from_key(skill).map(|known| w.skill(known).unwrap_or(0.0)))
            .unwrap_or(PLACEHOLDER_CURRENT_LEVEL);

        gaps.push(SkillGap {
            skill: skill.clone(),
            current_level,
            required_level,
            gap: required_level - current_level,
        });
    }

    let recommended_training = match worker {
        Some(_) => training_for_gaps(&gaps),
        None => vec![placeholder_training()],
    };

    Ok(SkillGapResponse {
        gaps,
        recommended_training,
    })
}

fn placeholder_training() -> TrainingRecommendation {
    TrainingRecommendation {
        skill: "Advanced Technical Skills".to_string(),
        priority: TrainingPriority::High,
        estimated_hours: 12,
    }
}

fn training_for_gaps(gaps: &[SkillGap]) -> Vec<TrainingRecommendation> {
    let mut open: Vec<&SkillGap> = gaps.iter().filter(|g| g.gap > 0.0).collect();
    open.sort_by(|a, b| b.gap.partial_cmp(&a.gap).unwrap_or(Ordering::Equal));

    open.into_iter()
        .map(|g| TrainingRecommendation {
            skill: Skill::from_key(&g.skill)
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| g.skill.clone()),
            priority: priority_for(g.gap),
            estimated_hours: (g.gap * HOURS_PER_LEVEL).ceil() as u32,
        })
        .collect()
}

fn priority_for(gap: f64) -> TrainingPriority {
    if gap >= HIGH_PRIORITY_GAP {
        TrainingPriority::High
    } else if gap >= MEDIUM_PRIORITY_GAP {
        TrainingPriority::Medium
    } else {
        TrainingPriority::Low
    }
}
