pub mod classify;
pub mod convert;
pub mod info;
pub mod sample;

use std::path::Path;

use lipcurve_model::viseme::{parse_viseme_frames, VisemeFrame};

/// Read and parse a JSONL viseme frame dump.
pub fn load_frames(path: &Path) -> anyhow::Result<Vec<VisemeFrame>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    parse_viseme_frames(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse viseme frames: {e}"))
}
