//! Mouth keyframes and curve sampling.
//!
//! A [`MouthCurve`] is a sparse sequence of `(time_ms, open)` keys where
//! `open` is either `0.0` (closed) or `1.0` (open). Intermediate values only
//! appear when the curve is sampled: keys are joined by flat-tangent
//! Hermite segments, so the mouth eases in and out of each key.

use serde::{Deserialize, Serialize};

/// Value of a closed-mouth key.
pub const CLOSED: f32 = 0.0;

/// Value of an open-mouth key.
pub const OPEN: f32 = 1.0;

/// Upper bound on the samples a single range sampling may produce.
pub const MAX_SAMPLES: usize = 1_000_000;

/// A single keyframe on the mouth-open curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Key time in milliseconds.
    #[serde(rename = "t")]
    pub time_ms: i64,

    /// Open amount, `0.0` or `1.0`.
    pub open: f32,
}

impl Keyframe {
    pub fn closed(time_ms: i64) -> Self {
        Self {
            time_ms,
            open: CLOSED,
        }
    }

    pub fn open(time_ms: i64) -> Self {
        Self {
            time_ms,
            open: OPEN,
        }
    }

    /// Whether this key holds the mouth open.
    pub fn is_open(&self) -> bool {
        self.open >= OPEN
    }

    /// Key time in seconds.
    pub fn time_secs(&self) -> f32 {
        self.time_ms as f32 * 0.001
    }
}

/// Result of sampling a curve at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    /// Interpolated open amount in `[0.0, 1.0]`.
    pub value: f32,
    /// Whether the sample time is at or past the final key.
    pub finished: bool,
}

/// An ordered sequence of mouth keyframes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MouthCurve {
    pub keyframes: Vec<Keyframe>,
}

impl MouthCurve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keyframes(keyframes: Vec<Keyframe>) -> Self {
        Self { keyframes }
    }

    pub fn push(&mut self, keyframe: Keyframe) {
        self.keyframes.push(keyframe);
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn first(&self) -> Option<&Keyframe> {
        self.keyframes.first()
    }

    pub fn last(&self) -> Option<&Keyframe> {
        self.keyframes.last()
    }

    /// Time spanned from first to last key.
    pub fn duration_ms(&self) -> i64 {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => last.time_ms - first.time_ms,
            _ => 0,
        }
    }

    /// Number of open keys.
    pub fn open_key_count(&self) -> usize {
        self.keyframes.iter().filter(|k| k.is_open()).count()
    }

    /// Keys as `(time_secs, value)` pairs ready for playback.
    ///
    /// A key landing on the same time as an earlier key is dropped; the
    /// first key at a given time wins.
    pub fn playback_keys(&self) -> Vec<(f32, f32)> {
        let mut keys: Vec<(f32, f32)> = self
            .keyframes
            .iter()
            .map(|k| (k.time_secs(), k.open))
            .collect();
        // Stable: equal times keep their emission order.
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        keys.dedup_by(|later, earlier| later.0 == earlier.0);
        keys
    }

    /// Sample the curve at `time_secs`.
    pub fn evaluate(&self, time_secs: f32) -> CurveSample {
        let keys = self.playback_keys();
        sample_keys(&keys, time_secs)
    }

    /// Number of samples [`sample_range`](Self::sample_range) produces for
    /// `step_secs`, or `None` if the step is unusable or the count would
    /// exceed [`MAX_SAMPLES`].
    pub fn sample_count(&self, step_secs: f32) -> Option<usize> {
        if !step_secs.is_finite() || step_secs <= 0.0 {
            return None;
        }
        let Some(last) = self.keyframes.iter().map(|k| k.time_secs()).reduce(f32::max) else {
            return Some(0);
        };
        if last < 0.0 {
            return Some(0);
        }
        let count = (last as f64 / step_secs as f64).floor() + 1.0;
        if count > MAX_SAMPLES as f64 {
            return None;
        }
        Some(count as usize)
    }

    /// Sample the curve at a fixed step from zero to its final key.
    ///
    /// Returns `None` under the same conditions as [`sample_count`](Self::sample_count).
    pub fn sample_range(&self, step_secs: f32) -> Option<Vec<(f32, f32)>> {
        let count = self.sample_count(step_secs)?;
        let keys = self.playback_keys();
        Some(
            (0..count)
                .map(|i| {
                    let t = i as f32 * step_secs;
                    (t, sample_keys(&keys, t).value)
                })
                .collect(),
        )
    }
}

fn sample_keys(keys: &[(f32, f32)], time_secs: f32) -> CurveSample {
    let Some(&(last_t, last_v)) = keys.last() else {
        return CurveSample {
            value: CLOSED,
            finished: true,
        };
    };
    let finished = time_secs >= last_t;

    let (first_t, first_v) = keys[0];
    if time_secs <= first_t {
        return CurveSample {
            value: first_v,
            finished,
        };
    }
    if finished {
        return CurveSample {
            value: last_v,
            finished,
        };
    }

    // Index of the last key at or before the sample time.
    let idx = keys.partition_point(|(t, _)| *t <= time_secs) - 1;
    let (t0, v0) = keys[idx];
    let (t1, v1) = keys[idx + 1];

    let s = (time_secs - t0) / (t1 - t0);
    let s2 = s * s;
    let s3 = s2 * s;
    let value = v0 * (2.0 * s3 - 3.0 * s2 + 1.0) + v1 * (3.0 * s2 - 2.0 * s3);

    CurveSample { value, finished }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse() -> MouthCurve {
        MouthCurve::from_keyframes(vec![
            Keyframe::closed(0),
            Keyframe::closed(100),
            Keyframe::open(225),
            Keyframe::closed(350),
        ])
    }

    #[test]
    fn test_evaluate_hits_keys_exactly() {
        let curve = pulse();
        assert_eq!(curve.evaluate(0.0).value, 0.0);
        assert!((curve.evaluate(Keyframe::open(225).time_secs()).value - 1.0).abs() < 1e-5);
        assert_eq!(curve.evaluate(Keyframe::closed(350).time_secs()).value, 0.0);
    }

    #[test]
    fn test_evaluate_midpoint_is_half() {
        let curve = MouthCurve::from_keyframes(vec![Keyframe::closed(0), Keyframe::open(1000)]);
        let sample = curve.evaluate(0.5);
        assert!((sample.value - 0.5).abs() < 1e-5);
        assert!(!sample.finished);
    }

    #[test]
    fn test_evaluate_eases_near_keys() {
        let curve = MouthCurve::from_keyframes(vec![Keyframe::closed(0), Keyframe::open(1000)]);
        // Flat tangents: a quarter of the way in, the value lags a straight line.
        assert!(curve.evaluate(0.25).value < 0.25);
        assert!(curve.evaluate(0.75).value > 0.75);
    }

    #[test]
    fn test_evaluate_outside_range_clamps() {
        let curve = MouthCurve::from_keyframes(vec![Keyframe::open(100), Keyframe::closed(200)]);
        let before = curve.evaluate(0.0);
        assert_eq!(before.value, 1.0);
        assert!(!before.finished);

        let after = curve.evaluate(5.0);
        assert_eq!(after.value, 0.0);
        assert!(after.finished);
    }

    #[test]
    fn test_finished_flag_at_last_key() {
        let curve = pulse();
        assert!(!curve.evaluate(0.3).finished);
        let end = curve.last().unwrap().time_secs();
        assert!(curve.evaluate(end).finished);
    }

    #[test]
    fn test_empty_curve_is_finished_and_closed() {
        let sample = MouthCurve::new().evaluate(1.0);
        assert_eq!(sample.value, 0.0);
        assert!(sample.finished);
    }

    #[test]
    fn test_duplicate_time_keeps_first_key() {
        let curve = MouthCurve::from_keyframes(vec![
            Keyframe::closed(0),
            Keyframe::open(0),
            Keyframe::closed(200),
        ]);
        let keys = curve.playback_keys();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0], (0.0, 0.0));
    }

    #[test]
    fn test_sample_range_covers_curve() {
        let curve = pulse();
        let samples = curve.sample_range(0.05).unwrap();
        assert_eq!(samples.first().map(|s| s.0), Some(0.0));
        assert!(samples.len() >= 7);
        assert!(samples.iter().all(|(_, v)| (0.0..=1.0).contains(v)));
        assert!(curve.sample_range(0.0).is_none());
        assert!(curve.sample_range(f32::NAN).is_none());
    }

    #[test]
    fn test_sample_range_rejects_excessive_counts() {
        let curve = MouthCurve::from_keyframes(vec![Keyframe::closed(0), Keyframe::closed(5000)]);
        assert_eq!(curve.sample_count(1e-9), None);
        assert!(curve.sample_range(1e-9).is_none());
        assert_eq!(curve.sample_count(1.0), Some(6));
    }

    #[test]
    fn test_sample_range_of_empty_curve() {
        assert_eq!(MouthCurve::new().sample_range(0.1), Some(vec![]));
    }

    #[test]
    fn test_playback_keys_sorted_and_deduplicated() {
        let curve = MouthCurve::from_keyframes(vec![
            Keyframe::closed(0),
            Keyframe::open(200),
            Keyframe::closed(100),
            Keyframe::closed(200),
            Keyframe::open(100),
        ]);
        let keys = curve.playback_keys();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[1].1, 0.0);
        assert_eq!(keys[2].1, 1.0);
    }

    #[test]
    fn test_duration_and_counts() {
        let curve = pulse();
        assert_eq!(curve.duration_ms(), 350);
        assert_eq!(curve.open_key_count(), 1);
        assert_eq!(curve.len(), 4);
    }
}
