pub mod forest;
pub mod linear;
pub mod logistic;
pub mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::FeatureSchema;
pub use forest::{TreeEnsemble, TreeNode, TreeTask};
pub use linear::LinearRegressor;
pub use logistic::LogisticClassifier;
pub use store::{ModelInfo, ModelLoadError, ModelSource, ModelStore};

/// What a predictor returns for one feature vector.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutput {
    Classification {
        label: String,
        probabilities: Vec<f64>,
    },
    Regression(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Classification,
    Regression,
}

#[derive(Debug, Error, PartialEq)]
pub enum InferenceError {
    #[error("expected {expected} features, got {found}")]
    InputLength { expected: usize, found: usize },
    #[error("model produced a non-finite value")]
    NonFinite,
    #[error("tree {tree} walked to missing node {node}")]
    BrokenTree { tree: usize, node: usize },
}

/// Artifact parameters that cannot produce a working predictor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidModel {
    #[error("{model} needs at least two classes")]
    TooFewClasses { model: &'static str },
    #[error("{model} parameters must be finite")]
    NonFinite { model: &'static str },
    #[error("linear_regressor has {found} coefficients, schema declares {expected} features")]
    CoefficientCount { expected: usize, found: usize },
    #[error("logistic_classifier has {rows} coefficient rows for {classes} classes")]
    RowCount { rows: usize, classes: usize },
    #[error("logistic_classifier has {intercepts} intercepts for {rows} coefficient rows")]
    InterceptCount { intercepts: usize, rows: usize },
    #[error("logistic_classifier row {row} has {found} coefficients, schema declares {expected} features")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("tree_ensemble has no trees")]
    NoTrees,
    #[error("tree {tree} has no nodes")]
    EmptyTree { tree: usize },
    #[error("tree {tree} node {node} splits on feature {feature}, schema has {input_len}")]
    FeatureOutOfRange {
        tree: usize,
        node: usize,
        feature: usize,
        input_len: usize,
    },
    #[error("tree {tree} node {node} has a non-finite threshold")]
    NonFiniteThreshold { tree: usize, node: usize },
    #[error("tree {tree} node {node} has invalid child {child}")]
    InvalidChild {
        tree: usize,
        node: usize,
        child: usize,
    },
    #[error("tree {tree} leaf {node} has {found} values, expected {expected}")]
    LeafWidth {
        tree: usize,
        node: usize,
        expected: usize,
        found: usize,
    },
}

/// Inference backend behind the model store.
///
/// Implementations are immutable after construction so a single instance can
/// serve concurrent requests without locking.
pub trait Predictor: Send + Sync {
    /// Artifact kind, e.g. "linear_regressor".
    fn name(&self) -> &'static str;

    /// Fixed when the artifact is loaded.
    fn output_kind(&self) -> OutputKind;

    /// Number of features each call to `infer` expects.
    fn input_len(&self) -> usize;

    fn infer(&self, features: &[f64]) -> Result<RawOutput, InferenceError>;

    fn check_input(&self, features: &[f64]) -> Result<(), InferenceError> {
        if features.len() != self.input_len() {
            return Err(InferenceError::InputLength {
                expected: self.input_len(),
                found: features.len(),
            });
        }
        Ok(())
    }
}

/// On-disk model artifact: a manifest plus the model parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    pub schema: FeatureSchema,
    pub model: ModelSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    LinearRegressor {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    LogisticClassifier {
        classes: Vec<String>,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
    TreeEnsemble {
        task: TreeTask,
        #[serde(default)]
        classes: Vec<String>,
        trees: Vec<forest::Tree>,
    },
}

impl ModelSpec {
    /// Validate parameter shapes against `input_len` and build the predictor.
    pub fn build(self, input_len: usize) -> Result<Box<dyn Predictor>, InvalidModel> {
        match self {
            ModelSpec::LinearRegressor {
                coefficients,
                intercept,
            } => Ok(Box::new(LinearRegressor::new(
                coefficients,
                intercept,
                input_len,
            )?)),
            ModelSpec::LogisticClassifier {
                classes,
                coefficients,
                intercepts,
            } => Ok(Box::new(LogisticClassifier::new(
                classes,
                coefficients,
                intercepts,
                input_len,
            )?)),
            ModelSpec::TreeEnsemble {
                task,
                classes,
                trees,
            } => Ok(Box::new(TreeEnsemble::new(task, classes, trees, input_len)?)),
        }
    }
}

pub(crate) fn ensure_finite(value: f64) -> Result<f64, InferenceError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InferenceError::NonFinite)
    }
}

/// Label of the most probable class; ties resolve to the earlier class.
pub(crate) fn argmax_label(classes: &[String], probabilities: &[f64]) -> String {
    let mut best = 0;
    for (idx, p) in probabilities.iter().enumerate() {
        if *p > probabilities[best] {
            best = idx;
        }
    }
    classes.get(best).cloned().unwrap_or_default()
}
