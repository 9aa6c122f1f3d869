//! Audio framing: PCM windows to viseme frames.
//!
//! Slices an interleaved PCM clip into fixed-size windows, hands each window
//! to a viseme inference engine, and stamps the result with the window's
//! start time. Decoding audio files into PCM and the inference itself are
//! the caller's concern.

use lipcurve_common::config::ConversionDefaults;
use lipcurve_common::error::{LipcurveError, LipcurveResult};
use lipcurve_model::viseme::{VisemeFrame, VisemeVector, VISEME_COUNT};
use serde::{Deserialize, Serialize};

/// Sample layout of a window passed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelLayout {
    Mono,
    /// Interleaved left/right samples.
    Stereo,
}

impl ChannelLayout {
    /// Layout for a channel count, if supported.
    pub fn from_channels(channels: u16) -> Option<Self> {
        match channels {
            1 => Some(Self::Mono),
            2 => Some(Self::Stereo),
            _ => None,
        }
    }

    pub fn channels(self) -> usize {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }
}

/// Engine output for one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisemeOutput {
    pub visemes: VisemeVector,
    pub laughter_score: f32,
}

impl Default for VisemeOutput {
    fn default() -> Self {
        Self {
            visemes: [0.0; VISEME_COUNT],
            laughter_score: 0.0,
        }
    }
}

/// A viseme inference engine.
///
/// Implementors own whatever native context the engine needs; it is created
/// before the first window and released when the engine is dropped.
pub trait VisemeEngine {
    /// Run inference on one window of interleaved samples.
    fn process_frame(
        &mut self,
        samples: &[f32],
        layout: ChannelLayout,
    ) -> LipcurveResult<VisemeOutput>;
}

/// Decoded, interleaved PCM audio.
#[derive(Debug, Clone)]
pub struct PcmClip {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved samples, `channels` per sample frame.
    pub samples: Vec<f32>,
}

impl PcmClip {
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> Self {
        Self {
            sample_rate,
            channels,
            samples,
        }
    }

    /// Clip length in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.channels as f64 / self.sample_rate as f64
    }
}

/// Configuration for audio framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramingConfig {
    /// Viseme frames per second of audio.
    pub frame_rate: u32,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self { frame_rate: 60 }
    }
}

impl From<&ConversionDefaults> for FramingConfig {
    fn from(defaults: &ConversionDefaults) -> Self {
        Self {
            frame_rate: defaults.frame_rate,
        }
    }
}

/// Start time of the window at interleaved `offset`, rounded up to whole ms.
pub fn window_start_ms(offset: usize, channels: u16, sample_rate: u32) -> i64 {
    let sample_frames = (offset / channels as usize) as u64;
    let rate = sample_rate as u64;
    ((sample_frames * 1000 + rate - 1) / rate) as i64
}

/// Run `engine` over `clip` window by window.
///
/// The final window is zero-padded to full size.
pub fn build_viseme_frames<E: VisemeEngine + ?Sized>(
    clip: &PcmClip,
    config: &FramingConfig,
    engine: &mut E,
) -> LipcurveResult<Vec<VisemeFrame>> {
    if clip.channels == 0 {
        return Err(LipcurveError::invalid_configuration(
            "clip has zero channels",
        ));
    }
    let Some(layout) = ChannelLayout::from_channels(clip.channels) else {
        return Err(LipcurveError::audio(format!(
            "cannot process visemes from a clip with more than 2 channels ({})",
            clip.channels
        )));
    };
    if clip.sample_rate == 0 {
        return Err(LipcurveError::invalid_configuration(
            "clip sample rate is zero",
        ));
    }
    if config.frame_rate == 0 || config.frame_rate > clip.sample_rate {
        return Err(LipcurveError::invalid_configuration(format!(
            "frame rate {} is not usable with sample rate {}",
            config.frame_rate, clip.sample_rate
        )));
    }

    let window = (clip.sample_rate / config.frame_rate) as usize * layout.channels();
    let total = clip.samples.len();
    tracing::info!(
        sample_rate = clip.sample_rate,
        channels = clip.channels,
        samples = total,
        window,
        "Framing PCM clip"
    );

    let mut frames = Vec::with_capacity(total.div_ceil(window));
    let mut buffer = vec![0.0f32; window];

    for (index, offset) in (0..total).step_by(window).enumerate() {
        let end = (offset + window).min(total);
        let chunk = &clip.samples[offset..end];
        buffer[..chunk.len()].copy_from_slice(chunk);
        buffer[chunk.len()..].fill(0.0);

        let output = engine.process_frame(&buffer, layout)?;
        frames.push(VisemeFrame {
            frame_number: index as i32,
            time_ms: window_start_ms(offset, clip.channels, clip.sample_rate),
            visemes: output.visemes,
            laughter_score: output.laughter_score,
        });
    }

    tracing::info!(
        frames = frames.len(),
        frame_rate = config.frame_rate,
        "Produced viseme frames"
    );

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lipcurve_model::viseme::Viseme;

    /// Reports `aa` for loud windows and silence otherwise.
    #[derive(Default)]
    struct LoudnessEngine {
        windows: Vec<(usize, ChannelLayout)>,
    }

    impl VisemeEngine for LoudnessEngine {
        fn process_frame(
            &mut self,
            samples: &[f32],
            layout: ChannelLayout,
        ) -> LipcurveResult<VisemeOutput> {
            self.windows.push((samples.len(), layout));
            let mean = samples.iter().map(|s| s.abs()).sum::<f32>() / samples.len() as f32;
            let mut output = VisemeOutput::default();
            let viseme = if mean > 0.1 { Viseme::Aa } else { Viseme::Sil };
            output.visemes[viseme.index()] = 1.0;
            Ok(output)
        }
    }

    struct FailingEngine;

    impl VisemeEngine for FailingEngine {
        fn process_frame(&mut self, _: &[f32], _: ChannelLayout) -> LipcurveResult<VisemeOutput> {
            Err(LipcurveError::engine("context lost"))
        }
    }

    #[test]
    fn test_mono_windows_and_timestamps() {
        // 1000 Hz at 10 fps -> 100-sample windows; 250 samples -> 3 windows.
        let clip = PcmClip::new(1000, 1, vec![0.5; 250]);
        let mut engine = LoudnessEngine::default();
        let frames =
            build_viseme_frames(&clip, &FramingConfig { frame_rate: 10 }, &mut engine).unwrap();

        assert_eq!(frames.len(), 3);
        assert_eq!(
            frames.iter().map(|f| f.time_ms).collect::<Vec<_>>(),
            vec![0, 100, 200]
        );
        assert_eq!(
            frames.iter().map(|f| f.frame_number).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(engine
            .windows
            .iter()
            .all(|&(len, layout)| len == 100 && layout == ChannelLayout::Mono));
    }

    #[test]
    fn test_short_final_window_is_zero_padded() {
        // Last window holds 10 loud samples and 90 zeros: quiet on average.
        let clip = PcmClip::new(1000, 1, vec![0.5; 110]);
        let mut engine = LoudnessEngine::default();
        let frames =
            build_viseme_frames(&clip, &FramingConfig { frame_rate: 10 }, &mut engine).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].visemes[Viseme::Aa.index()], 1.0);
        assert_eq!(frames[1].visemes[Viseme::Sil.index()], 1.0);
    }

    #[test]
    fn test_stereo_window_covers_both_channels() {
        // 48 kHz at 60 fps -> 800 sample frames -> 1600 interleaved samples.
        let clip = PcmClip::new(48_000, 2, vec![0.0; 1600 * 3]);
        let mut engine = LoudnessEngine::default();
        let frames = build_viseme_frames(&clip, &FramingConfig::default(), &mut engine).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(engine.windows[0], (1600, ChannelLayout::Stereo));
        assert_eq!(frames[1].time_ms, 17);
        assert_eq!(frames[2].time_ms, 34);
    }

    #[test]
    fn test_framing_config_follows_conversion_defaults() {
        let defaults = ConversionDefaults {
            frame_rate: 10,
            ..Default::default()
        };
        let config = FramingConfig::from(&defaults);
        assert_eq!(config.frame_rate, 10);

        let clip = PcmClip::new(1000, 1, vec![0.5; 200]);
        let mut engine = LoudnessEngine::default();
        let frames = build_viseme_frames(&clip, &config, &mut engine).unwrap();
        assert_eq!(frames.len(), 2);

        assert_eq!(
            FramingConfig::from(&ConversionDefaults::default()),
            FramingConfig::default()
        );
    }

    #[test]
    fn test_window_start_rounds_up() {
        assert_eq!(window_start_ms(0, 1, 44_100), 0);
        // 735 sample frames at 44.1 kHz is 16.67 ms.
        assert_eq!(window_start_ms(735, 1, 44_100), 17);
        assert_eq!(window_start_ms(1470, 2, 44_100), 17);
        assert_eq!(window_start_ms(44_100, 1, 44_100), 1000);
    }

    #[test]
    fn test_rejects_more_than_two_channels() {
        let clip = PcmClip::new(48_000, 6, vec![0.0; 600]);
        let err = build_viseme_frames(&clip, &FramingConfig::default(), &mut FailingEngine)
            .unwrap_err();
        assert!(matches!(err, LipcurveError::Audio { .. }));
    }

    #[test]
    fn test_rejects_unusable_rates() {
        let clip = PcmClip::new(30, 1, vec![0.0; 30]);
        let err = build_viseme_frames(&clip, &FramingConfig { frame_rate: 60 }, &mut FailingEngine)
            .unwrap_err();
        assert!(matches!(err, LipcurveError::InvalidConfiguration { .. }));

        let clip = PcmClip::new(0, 1, vec![0.0; 30]);
        assert!(build_viseme_frames(&clip, &FramingConfig::default(), &mut FailingEngine).is_err());
    }

    #[test]
    fn test_engine_error_aborts_pass() {
        let clip = PcmClip::new(1000, 1, vec![0.0; 300]);
        let err = build_viseme_frames(&clip, &FramingConfig { frame_rate: 10 }, &mut FailingEngine)
            .unwrap_err();
        assert!(matches!(err, LipcurveError::Engine { .. }));
    }

    #[test]
    fn test_empty_clip_produces_no_frames() {
        let clip = PcmClip::new(1000, 1, vec![]);
        let mut engine = LoudnessEngine::default();
        let frames =
            build_viseme_frames(&clip, &FramingConfig { frame_rate: 10 }, &mut engine).unwrap();
        assert!(frames.is_empty());
        assert!((clip.duration_secs() - 0.0).abs() < 1e-12);
    }
}
