//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LipcurveError, LipcurveResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default conversion settings.
    #[serde(default)]
    pub conversion: ConversionDefaults,

    /// Where generated curves are written.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default conversion parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionDefaults {
    /// Minimum spacing between emitted keyframes while the mouth toggles (ms).
    pub min_interval_ms: i64,

    /// Viseme frames per second requested from the inference engine.
    ///
    /// Read by callers that frame PCM audio themselves; JSONL frame dumps
    /// already carry their timestamps.
    pub frame_rate: u32,
}

/// Placement of generated curve files relative to their input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputLocation {
    /// A dedicated subdirectory next to the input file.
    #[default]
    LipSyncDirectory,
    /// The same directory as the input file.
    CurrentDirectory,
}

/// Output placement configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub location: OutputLocation,

    /// Subdirectory name used with [`OutputLocation::LipSyncDirectory`].
    pub directory_name: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "lipcurve_core=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for ConversionDefaults {
    fn default() -> Self {
        Self {
            min_interval_ms: 125,
            frame_rate: 60,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            location: OutputLocation::LipSyncDirectory,
            directory_name: "LipSyncs".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl OutputConfig {
    /// Resolve the curve file path for a given input file.
    ///
    /// `<input dir>/<directory_name>/<stem>.json` or `<input dir>/<stem>.json`.
    pub fn curve_path_for(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "curve".to_string());
        let dir = input.parent().map(Path::to_path_buf).unwrap_or_default();
        let dir = match self.location {
            OutputLocation::LipSyncDirectory => dir.join(&self.directory_name),
            OutputLocation::CurrentDirectory => dir,
        };
        dir.join(format!("{stem}.json"))
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }

    /// Reject settings the conversion pipeline cannot run with.
    pub fn validate(&self) -> LipcurveResult<()> {
        if self.conversion.min_interval_ms <= 0 {
            return Err(LipcurveError::config(format!(
                "conversion.min_interval_ms must be positive, got {}",
                self.conversion.min_interval_ms
            )));
        }
        if self.conversion.frame_rate == 0 {
            return Err(LipcurveError::config("conversion.frame_rate must be non-zero"));
        }
        if self.output.directory_name.trim().is_empty() {
            return Err(LipcurveError::config("output.directory_name is empty"));
        }
        Ok(())
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("lipcurve").join("config.json")
}
