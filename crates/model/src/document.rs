//! Curve documents: a generated curve plus the metadata needed to trace
//! how it was produced.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::curve::{MouthCurve, CLOSED, OPEN};

/// A persisted mouth curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveDocument {
    /// Schema version.
    pub version: String,

    /// Name of the clip the curve was generated from.
    pub source: String,

    /// Generation time (ISO 8601).
    pub generated_at: String,

    /// Minimum keyframe interval used by the reducer (ms).
    pub min_interval_ms: i64,

    /// Number of viseme frames consumed.
    pub frame_count: usize,

    /// The keyframes.
    pub curve: MouthCurve,
}

impl CurveDocument {
    /// Wrap a freshly generated curve.
    pub fn new(
        source: impl Into<String>,
        min_interval_ms: i64,
        frame_count: usize,
        curve: MouthCurve,
    ) -> Self {
        Self {
            version: "1.0".to_string(),
            source: source.into(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            min_interval_ms,
            frame_count,
            curve,
        }
    }

    /// Load a document from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref().to_path_buf();
        let json = std::fs::read_to_string(&path).map_err(|e| ModelError::IoError {
            path: path.clone(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| ModelError::ParseError { path, source: e })
    }

    /// Save the document as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ModelError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ModelError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        std::fs::write(&path, json).map_err(|e| ModelError::IoError { path, source: e })
    }

    /// Check the invariants every finished curve satisfies.
    pub fn validate(&self) -> Result<(), ModelError> {
        let keys = &self.curve.keyframes;
        if keys.is_empty() {
            return Err(ModelError::ValidationError {
                message: "curve has no keyframes".to_string(),
            });
        }
        if self.min_interval_ms <= 0 {
            return Err(ModelError::ValidationError {
                message: format!("min_interval_ms {} is not positive", self.min_interval_ms),
            });
        }
        if let Some(pair) = keys.windows(2).find(|w| w[1].time_ms < w[0].time_ms) {
            return Err(ModelError::ValidationError {
                message: format!(
                    "keyframe at {}ms precedes keyframe at {}ms",
                    pair[1].time_ms, pair[0].time_ms
                ),
            });
        }
        if let Some(key) = keys.iter().find(|k| k.open != CLOSED && k.open != OPEN) {
            return Err(ModelError::ValidationError {
                message: format!("keyframe at {}ms has value {}", key.time_ms, key.open),
            });
        }
        Ok(())
    }
}

/// Errors that can occur when reading or writing curve documents.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid curve: {message}")]
    ValidationError { message: String },
}
