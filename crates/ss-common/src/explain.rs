use crate::skills::Skill;
use crate::{TaskRequirements, WorkerRecord};

pub const GENERIC_REASON: &str = "Suitable based on available metrics";

const SKILL_MATCH_THRESHOLD: f64 = 0.8;

/// Rule-based justification for a recommendation.
///
/// Independent of the model: the same worker and task always produce the same
/// text. `_score` is accepted so callers can pass the model output alongside,
/// but no rule reads it.
pub fn explain(worker: &WorkerRecord, _score: f64, task: &TaskRequirements) -> String {
    let mut reasons = Vec::new();

    let performance = worker.performance_score.unwrap_or(0.0);
    if performance > 90.0 {
        reasons.push(format!("High performance score ({performance:.1}%)"));
    } else if performance > 80.0 {
        reasons.push(format!("Good performance score ({performance:.1}%)"));
    }

    let accuracy = worker.recent_accuracy_avg.unwrap_or(0.0);
    if accuracy > 0.95 {
        reasons.push(format!("Excellent accuracy ({:.1}%)", accuracy * 100.0));
    } else if accuracy > 0.90 {
        reasons.push(format!("High accuracy ({:.1}%)", accuracy * 100.0));
    }

    let years = worker.years_experience.unwrap_or(0.0);
    if years > 5.0 {
        reasons.push(format!("Experienced worker ({years} years)"));
    }

    let skill_matches = Skill::all()
        .filter(|skill| task.requires(*skill))
        .filter_map(|skill| {
            worker
                .skill(skill)
                .filter(|level| *level > SKILL_MATCH_THRESHOLD)
                .map(|level| format!("{} ({:.0}%)", skill.label(), level * 100.0))
        })
        .collect::<Vec<_>>();
    if !skill_matches.is_empty() {
        reasons.push(format!("Strong skills in: {}", skill_matches.join(", ")));
    }

    let rating = worker.rating_by_manager.unwrap_or(0.0);
    if rating > 4.5 {
        reasons.push(format!("High manager rating ({rating:.1}/5)"));
    }

    if reasons.is_empty() {
        reasons.push(GENERIC_REASON.to_string());
    }

    format!("{}.", reasons.join(". "))
}
