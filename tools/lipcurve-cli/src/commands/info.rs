//! Show curve information.

use std::path::PathBuf;

use lipcurve_model::document::CurveDocument;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let document =
        CurveDocument::load(&path).map_err(|e| anyhow::anyhow!("Failed to load curve: {e}"))?;

    println!("Curve: {}", document.source);
    println!("  Version: {}", document.version);
    println!("  Generated: {}", document.generated_at);
    println!("  Viseme frames: {}", document.frame_count);
    println!("  Min interval: {}ms", document.min_interval_ms);
    println!();

    let curve = &document.curve;
    println!("Keyframes:");
    println!("  Count: {}", curve.len());
    println!("  Open keys: {}", curve.open_key_count());
    println!("  Duration: {}ms", curve.duration_ms());
    println!();

    match document.validate() {
        Ok(()) => println!("Curve is valid."),
        Err(e) => println!("Validation issue: {e}"),
    }

    Ok(())
}
