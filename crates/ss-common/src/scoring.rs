use thiserror::Error;

use crate::features::encode;
use crate::model::{InferenceError, ModelStore, RawOutput};
use crate::{TaskRequirements, WorkerRecord};

/// Substituted for a worker whose scoring failed in batch mode.
pub const FALLBACK_SCORE: f64 = 0.5;
pub const FALLBACK_CONFIDENCE: f64 = 0.3;
pub const FALLBACK_REASONING: &str = "Fallback scoring due to prediction error";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Suitability {
    pub score: f64,
    pub confidence: f64,
}

impl Suitability {
    pub const FALLBACK: Suitability = Suitability {
        score: FALLBACK_SCORE,
        confidence: FALLBACK_CONFIDENCE,
    };
}

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("worker record has no worker_id")]
    MissingWorkerId,
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
    #[error("classifier returned no class probabilities")]
    EmptyProbabilities,
}

/// Normalizes raw model output into a `(score, confidence)` pair; confidence is
/// always in [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    model: &'a ModelStore,
}

impl<'a> Scorer<'a> {
    pub fn new(model: &'a ModelStore) -> Self {
        Self { model }
    }

    pub fn score(
        &self,
        worker: &WorkerRecord,
        task: &TaskRequirements,
    ) -> Result<Suitability, ScoringError> {
        let vector = encode(worker, task);
        let output = self.model.infer(&vector)?;
        normalize_output(&output)
    }
}

/// Classification: the top class probability is both score and confidence.
/// Regression: the raw value is the score, unbounded; confidence is the score
/// clamped into [0, 1].
pub fn normalize_output(output: &RawOutput) -> Result<Suitability, ScoringError> {
    match output {
        RawOutput::Classification { probabilities, .. } => {
            let top = probabilities
                .iter()
                .copied()
                .reduce(f64::max)
                .ok_or(ScoringError::EmptyProbabilities)?;
            let top = finite(top)?.clamp(0.0, 1.0);
            Ok(Suitability {
                score: top,
                confidence: top,
            })
        }
        RawOutput::Regression(raw) => {
            let score = finite(*raw)?;
            Ok(Suitability {
                score,
                confidence: score.clamp(0.0, 1.0),
            })
        }
    }
}

fn finite(value: f64) -> Result<f64, ScoringError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScoringError::Inference(InferenceError::NonFinite))
    }
}
