//! Classified frames: the per-frame open/closed decision.

use serde::{Deserialize, Serialize};

use crate::viseme::{is_open_shape, Viseme};

/// A viseme frame reduced to a binary mouth state plus its dominant category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedFrame {
    /// Frame time in milliseconds, non-decreasing across a sequence.
    #[serde(rename = "t")]
    pub time_ms: i64,

    /// Whether open-shape likelihood outweighs closed-shape likelihood.
    pub is_open: bool,

    /// Index of the highest-likelihood category.
    pub caliber: usize,
}

impl ClassifiedFrame {
    pub fn new(time_ms: i64, is_open: bool, caliber: usize) -> Self {
        Self {
            time_ms,
            is_open,
            caliber,
        }
    }

    /// The dominant category, if the index is a known viseme.
    pub fn viseme(&self) -> Option<Viseme> {
        Viseme::from_index(self.caliber)
    }

    /// Whether the dominant category is itself an open-mouth shape.
    pub fn caliber_is_open_shape(&self) -> bool {
        is_open_shape(self.caliber)
    }
}
