//! Keyframe reduction: classified frames to a sparse open/closed curve.
//!
//! # Algorithm
//!
//! A single forward scan drives a small state machine:
//!
//! 1. **Anchor:** the first frame always yields a closed key at its time.
//! 2. **Idle:** while not speaking, an open frame starts an utterance with a
//!    closed key at the frame time.
//! 3. **Cadence:** while speaking, keys alternate open/closed on a fixed
//!    grid of `min_interval_ms` measured from the previous key, not from the
//!    frame that triggered them.
//! 4. **Hold:** an open key whose open-shaped category continues into the
//!    next frame is held until the category changes, then released with a
//!    second open key at the last frame of the run.
//! 5. **Finish:** an utterance still running at the end of input is closed
//!    with a trailing pulse; otherwise the curve is padded to the last frame.
//!
//! Times are integer milliseconds throughout.

use lipcurve_common::error::{LipcurveError, LipcurveResult};
use lipcurve_model::curve::{Keyframe, MouthCurve};
use lipcurve_model::status::ClassifiedFrame;
use lipcurve_model::viseme::is_open_shape;
use serde::{Deserialize, Serialize};

/// Configuration for the keyframe reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReducerConfig {
    /// Minimum spacing between cadence keys (ms). Must be positive.
    pub min_interval_ms: i64,
}

impl Default for ReducerConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 125,
        }
    }
}

impl ReducerConfig {
    pub fn new(min_interval_ms: i64) -> Self {
        Self { min_interval_ms }
    }

    pub fn validate(&self) -> LipcurveResult<()> {
        if self.min_interval_ms <= 0 {
            return Err(LipcurveError::invalid_configuration(format!(
                "min_interval_ms must be positive, got {}",
                self.min_interval_ms
            )));
        }
        Ok(())
    }
}

/// State carried across the frame scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReducerState {
    /// Inside an utterance: open/closed pairs are being emitted.
    pub speaking: bool,
    /// The last cadence key was open and a closing key is due next.
    pub closing_mouth: bool,
    /// An open key is being held while its category repeats.
    pub hold_open: bool,
    /// Time of the most recent key; the cadence grid is anchored here.
    pub last_key_time: i64,
    /// Classification-level speaking flag from the previous transition.
    pub last_was_speaking: bool,
}

/// The state after a transition and the key it emitted, if any.
pub type Transition = (ReducerState, Option<Keyframe>);

impl ReducerState {
    /// Initial transition for the first frame: a closed anchor key.
    pub fn anchor(first: &ClassifiedFrame) -> Transition {
        let state = Self {
            last_key_time: first.time_ms,
            ..Self::default()
        };
        (state, Some(Keyframe::closed(first.time_ms)))
    }

    /// Advance the machine by one frame (any frame after the first).
    pub fn step(
        self,
        frame: &ClassifiedFrame,
        next: Option<&ClassifiedFrame>,
        config: &ReducerConfig,
    ) -> Transition {
        if !self.speaking {
            self.idle_step(frame)
        } else if self.hold_open {
            self.hold_step(frame, next)
        } else if self.cadence_due(frame, config) {
            self.cadence_step(frame, next, config)
        } else {
            (self, None)
        }
    }

    /// Whether the cadence gate has opened for this frame.
    pub fn cadence_due(&self, frame: &ClassifiedFrame, config: &ReducerConfig) -> bool {
        frame.time_ms >= self.next_cadence_time(config)
    }

    fn next_cadence_time(&self, config: &ReducerConfig) -> i64 {
        self.last_key_time.saturating_add(config.min_interval_ms)
    }

    /// Not speaking: watch for an utterance to start.
    pub fn idle_step(mut self, frame: &ClassifiedFrame) -> Transition {
        if frame.is_open && !self.last_was_speaking {
            self.last_was_speaking = true;
            self.speaking = true;
            self.closing_mouth = false;
            self.last_key_time = frame.time_ms;
            return (self, Some(Keyframe::closed(frame.time_ms)));
        }
        if !frame.is_open && self.last_was_speaking {
            self.last_was_speaking = false;
            self.speaking = false;
            self.last_key_time = frame.time_ms;
            return (self, Some(Keyframe::closed(frame.time_ms)));
        }
        (self, None)
    }

    /// Holding open: release once the dominant category stops repeating.
    ///
    /// A missing next frame counts as a change, so a hold running into the
    /// end of input is released on the final frame.
    pub fn hold_step(
        mut self,
        frame: &ClassifiedFrame,
        next: Option<&ClassifiedFrame>,
    ) -> Transition {
        if next.map(|n| n.caliber) == Some(frame.caliber) {
            return (self, None);
        }
        self.hold_open = false;
        self.closing_mouth = true;
        self.last_key_time = frame.time_ms;
        (self, Some(Keyframe::open(frame.time_ms)))
    }

    /// Cadence gate open: emit the next key on the interval grid.
    ///
    /// Only a next frame that exists and is classified closed ends the
    /// utterance on a closing key.
    pub fn cadence_step(
        mut self,
        frame: &ClassifiedFrame,
        next: Option<&ClassifiedFrame>,
        config: &ReducerConfig,
    ) -> Transition {
        let time = self.next_cadence_time(config);
        self.last_key_time = time;

        if self.closing_mouth {
            self.closing_mouth = false;
            if next.is_some_and(|n| !n.is_open) {
                self.speaking = false;
                self.last_was_speaking = false;
            }
            return (self, Some(Keyframe::closed(time)));
        }

        let sustained = next.is_some_and(|n| n.caliber == frame.caliber)
            && is_open_shape(frame.caliber);
        if sustained {
            self.hold_open = true;
        } else {
            self.closing_mouth = true;
        }
        (self, Some(Keyframe::open(time)))
    }

    /// Keys appended after the scan.
    ///
    /// `last_key` is the last key emitted during the scan and
    /// `last_frame_time` the time of the final classified frame.
    pub fn finish(
        &self,
        last_key: &Keyframe,
        last_frame_time: i64,
        config: &ReducerConfig,
    ) -> Vec<Keyframe> {
        let interval = config.min_interval_ms;
        if self.speaking {
            if last_key.is_open() {
                vec![Keyframe::closed(last_key.time_ms.saturating_add(interval))]
            } else {
                let open_time = last_key.time_ms.saturating_add(interval);
                vec![
                    Keyframe::open(open_time),
                    Keyframe::closed(open_time.saturating_add(interval)),
                ]
            }
        } else if last_key.time_ms < last_frame_time {
            vec![Keyframe::closed(last_frame_time)]
        } else {
            vec![]
        }
    }
}

/// Reduces classified frames into a mouth curve.
pub struct KeyframeReducer {
    config: ReducerConfig,
}

impl KeyframeReducer {
    /// Create a reducer with the given configuration.
    pub fn new(config: ReducerConfig) -> Self {
        Self { config }
    }

    /// Create a reducer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ReducerConfig::default())
    }

    pub fn config(&self) -> &ReducerConfig {
        &self.config
    }

    /// Run the state machine over `frames`.
    ///
    /// Fails with `InvalidConfiguration` for a non-positive interval and with
    /// `InvalidInput` for an empty sequence. No partial output is produced.
    pub fn reduce(&self, frames: &[ClassifiedFrame]) -> LipcurveResult<MouthCurve> {
        self.config.validate()?;
        let Some(first) = frames.first() else {
            return Err(LipcurveError::invalid_input(
                "classified frame sequence is empty",
            ));
        };

        let mut curve = MouthCurve::new();
        let (mut state, anchor) = ReducerState::anchor(first);
        curve.keyframes.extend(anchor);

        for (i, frame) in frames.iter().enumerate().skip(1) {
            let next = frames.get(i + 1);
            let (updated, emitted) = state.step(frame, next, &self.config);
            if let Some(keyframe) = emitted {
                tracing::debug!(
                    frame_ms = frame.time_ms,
                    key_ms = keyframe.time_ms,
                    open = keyframe.open,
                    "Emitted keyframe"
                );
                curve.push(keyframe);
            }
            state = updated;
        }

        let last_frame_time = frames[frames.len() - 1].time_ms;
        if let Some(last_key) = curve.last().copied() {
            let tail = state.finish(&last_key, last_frame_time, &self.config);
            if state.speaking {
                tracing::debug!(
                    last_key_ms = last_key.time_ms,
                    "Input ended mid-utterance, closing curve"
                );
            }
            curve.keyframes.extend(tail);
        }

        tracing::info!(
            frames = frames.len(),
            keyframes = curve.len(),
            min_interval_ms = self.config.min_interval_ms,
            "Reduced classified frames to mouth curve"
        );

        Ok(curve)
    }
}
