use crate::{TaskRequirements, WorkerRecord};

pub const DEFAULT_DURATION_HOURS: f64 = 4.0;
pub const DEFAULT_COMPLEXITY: f64 = 0.5;
pub const DEFAULT_COMPLETION_TIME_AVG: f64 = 0.5;
/// Estimates never drop below this share of the nominal duration.
pub const MIN_DURATION_RATIO: f64 = 0.7;

const COMPLEXITY_WEIGHT: f64 = 0.5;
const SPEED_WEIGHT: f64 = 0.3;

/// Heuristic completion-time estimate in hours.
///
/// `multiplier = 1 + 0.5·complexity − 0.3·speed` where
/// `speed = 1 − task_completion_time_avg`. A worker completion average of zero
/// is treated as unreported.
pub fn estimate_completion_hours(worker: &WorkerRecord, task: &TaskRequirements) -> f64 {
    let base = task.duration_hours.unwrap_or(DEFAULT_DURATION_HOURS);
    let complexity = task.task_complexity.unwrap_or(DEFAULT_COMPLEXITY);
    let completion_avg = worker
        .task_completion_time_avg
        .filter(|avg| *avg != 0.0)
        .unwrap_or(DEFAULT_COMPLETION_TIME_AVG);
    let worker_speed = 1.0 - completion_avg;

    let multiplier = 1.0 + complexity * COMPLEXITY_WEIGHT - worker_speed * SPEED_WEIGHT;

    (base * multiplier).max(base * MIN_DURATION_RATIO)
}
