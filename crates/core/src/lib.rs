//! Lipcurve Core
//!
//! Turns viseme likelihoods into a sparse mouth-open curve:
//! - **Framing:** Slice PCM audio into windows for a viseme engine
//! - **Classifier:** Reduce each viseme frame to open/closed plus a dominant category
//! - **Reducer:** Collapse classified frames into timed open/closed keyframes
//!
//! Classification and reduction are pure computation: no I/O, no shared
//! state. All inputs are data; all outputs are data.

pub mod classifier;
pub mod framing;
pub mod pipeline;
pub mod reducer;

pub use framing::{build_viseme_frames, PcmClip, VisemeEngine};
pub use pipeline::{convert, Conversion, ConversionConfig};
pub use reducer::{KeyframeReducer, ReducerConfig};
