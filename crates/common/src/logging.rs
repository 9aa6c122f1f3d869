//! Logging and tracing initialization.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Directives used by `--verbose`: debug output from the lipcurve crates,
/// everything else stays at info.
pub const VERBOSE_DIRECTIVES: &str =
    "info,lipcurve=debug,lipcurve_common=debug,lipcurve_model=debug,lipcurve_core=debug";

const FALLBACK_DIRECTIVES: &str = "info";

/// Build the event filter for `config`.
///
/// `RUST_LOG` wins when set and parseable. A configured level that does not
/// parse falls back to `info` instead of silently dropping every directive.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVES))
}

/// Initialize the tracing subscriber with the given configuration.
///
/// Logs go to stderr so that command output on stdout stays machine-readable.
/// A second call is a no-op.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::fmt;

    let builder = fmt::Subscriber::builder()
        .with_env_filter(build_filter(config))
        .with_writer(std::io::stderr);

    let installed = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(
            builder
                .with_target(true)
                .with_file(false)
                .with_line_number(false)
                .finish(),
        )
    };

    if installed.is_ok() {
        tracing::debug!(level = %config.level, json = config.json, "Logging initialized");
    }
}

/// Initialize logging with defaults (useful for tests and quick scripts).
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}
