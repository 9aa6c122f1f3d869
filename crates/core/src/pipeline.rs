//! End-to-end conversion: viseme frames to a mouth curve.

use lipcurve_common::error::{LipcurveError, LipcurveResult};
use lipcurve_model::curve::MouthCurve;
use lipcurve_model::status::ClassifiedFrame;
use lipcurve_model::viseme::{parse_viseme_frames, VisemeFrame};
use serde::{Deserialize, Serialize};

use crate::classifier::classify;
use crate::reducer::{KeyframeReducer, ReducerConfig};

/// Configuration for a full conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    pub reducer: ReducerConfig,
}

impl ConversionConfig {
    pub fn with_min_interval(min_interval_ms: i64) -> Self {
        Self {
            reducer: ReducerConfig::new(min_interval_ms),
        }
    }
}

/// Output of a conversion: the intermediate classification and the curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub classified: Vec<ClassifiedFrame>,
    pub curve: MouthCurve,
}

/// Classify and reduce `frames`.
pub fn convert(frames: &[VisemeFrame], config: &ConversionConfig) -> LipcurveResult<Conversion> {
    config.reducer.validate()?;
    if frames.is_empty() {
        return Err(LipcurveError::invalid_input("no viseme frames to convert"));
    }

    let classified = classify(frames);
    let curve = KeyframeReducer::new(config.reducer).reduce(&classified)?;
    Ok(Conversion { classified, curve })
}

/// Parse JSONL viseme frames and convert them.
pub fn convert_jsonl(jsonl: &str, config: &ConversionConfig) -> LipcurveResult<Conversion> {
    let frames = parse_viseme_frames(jsonl)?;
    tracing::debug!(frames = frames.len(), "Parsed viseme frames");
    convert(&frames, config)
}
