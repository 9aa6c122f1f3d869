//! Print the per-frame classification.

use std::path::PathBuf;

use lipcurve_core::classifier::classify;

pub fn run(input: PathBuf) -> anyhow::Result<()> {
    let frames = super::load_frames(&input)?;
    let classified = classify(&frames);
    println!("{}", serde_json::to_string_pretty(&classified)?);
    Ok(())
}
