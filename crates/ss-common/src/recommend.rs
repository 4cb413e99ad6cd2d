use std::cmp::Ordering;

use thiserror::Error;
use tracing::{debug, warn};

use crate::api::batch_suitability::WorkerSuitability;
use crate::api::best_worker::{AlternativeWorker, BestWorkerResponse};
use crate::api::performance::PerformanceResponse;
use crate::estimate::estimate_completion_hours;
use crate::explain::explain;
use crate::scoring::{ScoringError, Scorer, Suitability, FALLBACK_REASONING};
use crate::skills::Skill;
use crate::{TaskRequirements, WorkerRecord};

pub const MAX_ALTERNATIVES: usize = 3;
pub const SUCCESS_RATE_CAP: f64 = 0.95;

/// Returned by the performance endpoint when no worker record is supplied.
pub const PLACEHOLDER_PREDICTED_SCORE: f64 = 0.85;
pub const PLACEHOLDER_CONFIDENCE: f64 = 0.78;
pub const PLACEHOLDER_RISK_FACTORS: [&str; 2] = [
    "Task complexity is high",
    "Worker has limited experience with this task type",
];

const HIGH_COMPLEXITY: f64 = 0.7;
const LIMITED_EXPERIENCE_YEARS: f64 = 2.0;
const ACCURACY_TARGET: f64 = 0.85;

#[derive(Debug, Error, PartialEq)]
pub enum RecommendError {
    #[error("No workers provided")]
    NoWorkers,
    #[error("no worker could be scored ({attempted} attempted)")]
    NoWorkerScored { attempted: usize },
}

/// A response body together with how many workers fell back or were skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub body: T,
    pub failed_workers: usize,
}

struct Candidate<'w> {
    worker: &'w WorkerRecord,
    id: String,
    suitability: Suitability,
}

fn score_with_id<'w>(
    scorer: &Scorer<'_>,
    worker: &'w WorkerRecord,
    task: &TaskRequirements,
) -> Result<Candidate<'w>, ScoringError> {
    let id = worker
        .worker_id
        .clone()
        .ok_or(ScoringError::MissingWorkerId)?;
    let suitability = scorer.score(worker, task)?;
    Ok(Candidate {
        worker,
        id,
        suitability,
    })
}

fn alternative(candidate: &Candidate<'_>, task: &TaskRequirements) -> AlternativeWorker {
    AlternativeWorker {
        worker_id: candidate.id.clone(),
        score: candidate.suitability.score,
        reasoning: explain(candidate.worker, candidate.suitability.score, task),
    }
}

/// Pick the highest-scoring worker for `task`.
///
/// Workers that fail to score are skipped. Ties keep the earlier worker.
pub fn recommend_best_worker(
    scorer: &Scorer<'_>,
    task: &TaskRequirements,
    workers: &[WorkerRecord],
) -> Result<Outcome<BestWorkerResponse>, RecommendError> {
    if workers.is_empty() {
        return Err(RecommendError::NoWorkers);
    }

    let mut best: Option<Candidate<'_>> = None;
    let mut alternatives = Vec::new();
    let mut failed_workers = 0;

    for worker in workers {
        let candidate = match score_with_id(scorer, worker, task) {
            Ok(candidate) => candidate,
            Err(err) => {
                warn!(worker_id = worker.id_or_unknown(), error = %err, "skipping worker");
                failed_workers += 1;
                continue;
            }
        };

        let beats_current = best
            .as_ref()
            .map_or(true, |current| candidate.suitability.score > current.suitability.score);

        if beats_current {
            if let Some(previous) = best.replace(candidate) {
                alternatives.push(alternative(&previous, task));
            }
        } else {
            alternatives.push(alternative(&candidate, task));
        }
    }

    let best = best.ok_or(RecommendError::NoWorkerScored {
        attempted: workers.len(),
    })?;

    alternatives.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    alternatives.truncate(MAX_ALTERNATIVES);

    debug!(
        best_worker_id = %best.id,
        score = best.suitability.score,
        alternatives = alternatives.len(),
        failed_workers,
        "best worker selected"
    );

    let score = best.suitability.score;
    Ok(Outcome {
        body: BestWorkerResponse {
            reasoning: explain(best.worker, score, task),
            predicted_completion_time: estimate_completion_hours(best.worker, task),
            predicted_success_rate: score.min(SUCCESS_RATE_CAP),
            confidence: best.suitability.confidence,
            alternative_workers: alternatives,
            best_worker_id: best.id,
        },
        failed_workers,
    })
}

/// Score every worker independently, substituting the fallback result on failure.
pub fn batch_suitability(
    scorer: &Scorer<'_>,
    task: &TaskRequirements,
    workers: &[WorkerRecord],
) -> Result<Outcome<Vec<WorkerSuitability>>, RecommendError> {
    if workers.is_empty() {
        return Err(RecommendError::NoWorkers);
    }

    let mut failed_workers = 0;
    let results = workers
        .iter()
        .map(|worker| match score_with_id(scorer, worker, task) {
            Ok(candidate) => WorkerSuitability {
                reasoning: explain(worker, candidate.suitability.score, task),
                score: candidate.suitability.score,
                confidence: candidate.suitability.confidence,
                worker_id: candidate.id,
            },
            Err(err) => {
                warn!(worker_id = worker.id_or_unknown(), error = %err, "using fallback score");
                failed_workers += 1;
                WorkerSuitability {
                    worker_id: worker.id_or_unknown().to_string(),
                    score: Suitability::FALLBACK.score,
                    confidence: Suitability::FALLBACK.confidence,
                    reasoning: FALLBACK_REASONING.to_string(),
                }
            }
        })
        .collect();

    Ok(Outcome {
        body: results,
        failed_workers,
    })
}

/// Fixed illustrative prediction used when the caller sends no worker record.
pub fn placeholder_performance() -> PerformanceResponse {
    PerformanceResponse {
        predicted_score: PLACEHOLDER_PREDICTED_SCORE,
        confidence: PLACEHOLDER_CONFIDENCE,
        risk_factors: PLACEHOLDER_RISK_FACTORS
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

/// Model-backed prediction for one worker/task pair.
pub fn predict_performance(
    scorer: &Scorer<'_>,
    worker: &WorkerRecord,
    task: &TaskRequirements,
) -> Result<PerformanceResponse, ScoringError> {
    let suitability = scorer.score(worker, task)?;
    Ok(PerformanceResponse {
        predicted_score: suitability.score,
        confidence: suitability.confidence,
        risk_factors: risk_factors(worker, task),
    })
}

pub fn risk_factors(worker: &WorkerRecord, task: &TaskRequirements) -> Vec<String> {
    let mut risks = Vec::new();

    if task.task_complexity.unwrap_or(0.0) > HIGH_COMPLEXITY {
        risks.push("Task complexity is high".to_string());
    }
    if worker.years_experience.unwrap_or(0.0) < LIMITED_EXPERIENCE_YEARS {
        risks.push("Worker has limited experience".to_string());
    }
    for skill in Skill::all().filter(|skill| task.requires(*skill)) {
        let required = task.skill(skill).unwrap_or(0.0);
        let current = worker.skill(skill).unwrap_or(0.0);
        if current < required {
            risks.push(format!(
                "{} proficiency {:.0}% below required {:.0}%",
                skill.label(),
                current * 100.0,
                required * 100.0
            ));
        }
    }
    if let Some(accuracy) = worker.recent_accuracy_avg {
        if accuracy < ACCURACY_TARGET {
            risks.push(format!("Recent accuracy {:.1}% below target", accuracy * 100.0));
        }
    }

    risks
}
