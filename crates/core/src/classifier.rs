//! Per-frame classification of viseme likelihoods.
//!
//! Each frame collapses to an open/closed decision and a dominant category.
//! The two tie-breaks are independent: equal open and closed mass counts as
//! open, while equal top likelihoods resolve to the lowest index.

use lipcurve_model::status::ClassifiedFrame;
use lipcurve_model::viseme::{VisemeFrame, MOUTH_SHAPE_OPEN};

/// Sum the likelihood mass on open-shape and closed-shape categories.
///
/// Returns `(open_sum, closed_sum)`.
pub fn open_closed_sums(visemes: &[f32]) -> (f32, f32) {
    let mut opened = 0.0;
    let mut closed = 0.0;
    for (i, &likelihood) in visemes.iter().enumerate() {
        if MOUTH_SHAPE_OPEN.get(i).copied().unwrap_or(false) {
            opened += likelihood;
        } else {
            closed += likelihood;
        }
    }
    (opened, closed)
}

/// Index of the highest likelihood. The first maximum wins; an all-zero
/// vector resolves to category 0.
pub fn dominant_viseme(visemes: &[f32]) -> usize {
    let mut max_likelihood = 0.0;
    let mut caliber = 0;
    for (i, &likelihood) in visemes.iter().enumerate() {
        if max_likelihood < likelihood {
            max_likelihood = likelihood;
            caliber = i;
        }
    }
    caliber
}

/// Classify a single viseme frame.
pub fn classify_frame(frame: &VisemeFrame) -> ClassifiedFrame {
    let (opened, closed) = open_closed_sums(&frame.visemes);
    ClassifiedFrame::new(
        frame.time_ms,
        opened >= closed,
        dominant_viseme(&frame.visemes),
    )
}

/// Classify a sequence of viseme frames, preserving order.
pub fn classify(frames: &[VisemeFrame]) -> Vec<ClassifiedFrame> {
    let classified: Vec<ClassifiedFrame> = frames.iter().map(classify_frame).collect();
    tracing::debug!(
        frames = classified.len(),
        open = classified.iter().filter(|f| f.is_open).count(),
        "Classified viseme frames"
    );
    classified
}
