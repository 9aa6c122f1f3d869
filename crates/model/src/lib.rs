//! Lipcurve Model
//!
//! Defines the data contracts shared by every stage of curve generation:
//! - **Visemes:** The category table and per-window engine output
//! - **Status:** Frames reduced to an open/closed decision and dominant category
//! - **Curve:** Sparse mouth keyframes and their playback sampling
//! - **Document:** A persisted curve with generation metadata
//!
//! All times are integer milliseconds from the start of the clip.

pub mod curve;
pub mod document;
pub mod status;
pub mod viseme;

pub use curve::*;
pub use document::*;
pub use status::*;
pub use viseme::*;
