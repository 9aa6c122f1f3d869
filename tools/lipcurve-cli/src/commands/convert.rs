//! Convert viseme frames into a curve document.

use std::path::PathBuf;

use lipcurve_common::config::AppConfig;
use lipcurve_core::pipeline::{convert, ConversionConfig};
use lipcurve_model::document::CurveDocument;

pub fn run(
    config: &AppConfig,
    input: PathBuf,
    output: Option<PathBuf>,
    dump_intermediate: bool,
) -> anyhow::Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    println!("Converting viseme frames from: {}", input.display());

    let frames = super::load_frames(&input)?;
    println!("  Loaded {} frames", frames.len());

    let conversion_config = ConversionConfig::with_min_interval(config.conversion.min_interval_ms);
    let conversion = convert(&frames, &conversion_config)
        .map_err(|e| anyhow::anyhow!("Conversion failed: {e}"))?;

    let open_frames = conversion.classified.iter().filter(|f| f.is_open).count();
    println!(
        "  Classified {} frames ({} open)",
        conversion.classified.len(),
        open_frames
    );
    println!(
        "  Generated {} keyframes over {}ms",
        conversion.curve.len(),
        conversion.curve.duration_ms()
    );

    let output = output.unwrap_or_else(|| config.output.curve_path_for(&input));
    let source = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if dump_intermediate {
        let status_path = output.with_file_name(format!("{source}_status.json"));
        if let Some(parent) = status_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&conversion.classified)?;
        std::fs::write(&status_path, json)?;
        println!("  Classified frames saved to: {}", status_path.display());
    }

    let document = CurveDocument::new(
        source,
        config.conversion.min_interval_ms,
        frames.len(),
        conversion.curve,
    );
    document
        .save(&output)
        .map_err(|e| anyhow::anyhow!("Failed to save curve: {e}"))?;

    tracing::info!(path = %output.display(), "Curve written");
    println!("  Curve saved to: {}", output.display());
    println!("\nConversion complete.");

    Ok(())
}
