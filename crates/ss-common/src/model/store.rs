use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use super::{
    InferenceError, InvalidModel, ModelArtifact, OutputKind, Predictor, RawOutput,
};
use crate::features::{FeatureVector, SchemaMismatch};

pub const ARTIFACT_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("no model artifact (*.json) found in {dir}")]
    NoArtifact { dir: String },
    #[error(
        "{} model artifacts found in {dir}; pass an explicit model path: {}",
        .candidates.len(),
        .candidates.join(", ")
    )]
    AmbiguousArtifacts { dir: String, candidates: Vec<String> },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model artifact {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("model artifact {path} does not match the feature schema: {source}")]
    SchemaMismatch {
        path: String,
        #[source]
        source: SchemaMismatch,
    },
    #[error("model artifact {path} has invalid parameters: {source}")]
    InvalidParameters {
        path: String,
        #[source]
        source: InvalidModel,
    },
}

/// Where the model artifact comes from. An explicit path always wins over
/// directory discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    Path(PathBuf),
    Directory(PathBuf),
}

impl ModelSource {
    pub fn resolve(path: Option<PathBuf>, dir: PathBuf) -> Self {
        match path {
            Some(path) => ModelSource::Path(path),
            None => ModelSource::Directory(dir),
        }
    }

    pub fn load(&self) -> Result<ModelStore, ModelLoadError> {
        match self {
            ModelSource::Path(path) => ModelStore::load(path),
            ModelSource::Directory(dir) => ModelStore::discover(dir),
        }
    }
}

/// Metadata reported by the health and info endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: Option<String>,
    pub kind: &'static str,
    pub output_kind: OutputKind,
    pub schema_version: u32,
    pub feature_count: usize,
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

/// The process-wide, read-only model handle.
pub struct ModelStore {
    predictor: Box<dyn Predictor>,
    info: ModelInfo,
}

impl fmt::Debug for ModelStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelStore").field("info", &self.info).finish()
    }
}

impl ModelStore {
    /// Load and validate one artifact file.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let source_path = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
            path: source_path.clone(),
            source,
        })?;
        let artifact: ModelArtifact =
            serde_json::from_str(&raw).map_err(|source| ModelLoadError::Parse {
                path: source_path.clone(),
                source,
            })?;

        let store = Self::from_artifact(artifact, &source_path)?;
        info!(
            path = %source_path,
            model = %store.info.name,
            version = store.info.version.as_deref().unwrap_or(""),
            kind = store.info.kind,
            output_kind = ?store.info.output_kind,
            "model loaded"
        );
        Ok(store)
    }

    /// Find exactly one artifact in `dir` and load it.
    pub fn discover(dir: &Path) -> Result<Self, ModelLoadError> {
        let dir_display = dir.display().to_string();
        let entries = fs::read_dir(dir).map_err(|source| ModelLoadError::Io {
            path: dir_display.clone(),
            source,
        })?;

        let mut candidates = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ModelLoadError::Io {
                path: dir_display.clone(),
                source,
            })?;
            let path = entry.path();
            let is_artifact = path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(ARTIFACT_EXTENSION));
            if is_artifact {
                candidates.push(path);
            }
        }
        candidates.sort();

        match candidates.as_slice() {
            [] => Err(ModelLoadError::NoArtifact { dir: dir_display }),
            [only] => Self::load(only),
            many => {
                let candidates = many
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>();
                warn!(dir = %dir_display, count = candidates.len(), "ambiguous model artifacts");
                Err(ModelLoadError::AmbiguousArtifacts {
                    dir: dir_display,
                    candidates,
                })
            }
        }
    }

    /// Validate an already parsed artifact against the encoder schema and build it.
    pub fn from_artifact(artifact: ModelArtifact, source: &str) -> Result<Self, ModelLoadError> {
        if let Some(mismatch) = artifact.schema.first_mismatch() {
            return Err(ModelLoadError::SchemaMismatch {
                path: source.to_string(),
                source: mismatch,
            });
        }

        let schema_version = artifact.schema.version;
        let feature_count = artifact.schema.len();
        let predictor = artifact.model.build(feature_count).map_err(|invalid| {
            ModelLoadError::InvalidParameters {
                path: source.to_string(),
                source: invalid,
            }
        })?;

        let info = ModelInfo {
            name: artifact.name,
            version: artifact.version,
            kind: predictor.name(),
            output_kind: predictor.output_kind(),
            schema_version,
            feature_count,
            source: source.to_string(),
            loaded_at: Utc::now(),
        };

        Ok(Self { predictor, info })
    }

    pub fn infer(&self, vector: &FeatureVector) -> Result<RawOutput, InferenceError> {
        self.predictor.infer(vector.as_slice())
    }

    pub fn output_kind(&self) -> OutputKind {
        self.info.output_kind
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }
}
