//! Lipcurve CLI: command-line interface for mouth curve generation.
//!
//! Usage:
//!   lipcurve convert <FRAMES>   Convert viseme frames into a mouth curve
//!   lipcurve classify <FRAMES>  Print the per-frame open/closed classification
//!   lipcurve sample <CURVE>     Sample a generated curve over time
//!   lipcurve info <CURVE>       Show curve information

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lipcurve_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "lipcurve",
    about = "Generate open/closed mouth animation curves from viseme frames",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/lipcurve/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a JSONL viseme frame dump into a mouth curve
    Convert {
        /// Path to the viseme frames (one JSON object per line)
        input: PathBuf,

        /// Output curve path (defaults to the configured output location)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum keyframe interval in milliseconds
        #[arg(long)]
        min_interval: Option<i64>,

        /// Also write the classified frames next to the curve
        #[arg(long)]
        dump_intermediate: bool,
    },

    /// Print classified frames as JSON
    Classify {
        /// Path to the viseme frames
        input: PathBuf,
    },

    /// Sample a curve at a fixed step
    Sample {
        /// Path to the curve document
        path: PathBuf,

        /// Sampling step in seconds
        #[arg(long, default_value = "0.016666668")]
        step: f32,
    },

    /// Show curve information
    Info {
        /// Path to the curve document
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = lipcurve_common::logging::VERBOSE_DIRECTIVES.to_string();
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    lipcurve_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Convert {
            input,
            output,
            min_interval,
            dump_intermediate,
        } => {
            if let Some(min_interval) = min_interval {
                config.conversion.min_interval_ms = min_interval;
            }
            commands::convert::run(&config, input, output, dump_intermediate)
        }
        Commands::Classify { input } => commands::classify::run(input),
        Commands::Sample { path, step } => commands::sample::run(path, step),
        Commands::Info { path } => commands::info::run(path),
    }
}
