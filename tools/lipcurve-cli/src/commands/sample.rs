//! Sample a curve document over its duration.

use std::path::PathBuf;

use lipcurve_model::document::CurveDocument;

pub fn run(path: PathBuf, step: f32) -> anyhow::Result<()> {
    if !step.is_finite() || step <= 0.0 {
        anyhow::bail!("Sampling step must be positive, got {step}");
    }

    let document =
        CurveDocument::load(&path).map_err(|e| anyhow::anyhow!("Failed to load curve: {e}"))?;

    let Some(samples) = document.curve.sample_range(step) else {
        anyhow::bail!(
            "Sampling step {step} would produce more than {} samples",
            lipcurve_model::curve::MAX_SAMPLES
        );
    };

    for (time, value) in samples {
        println!("{time:.4}\t{value:.4}");
    }

    Ok(())
}
