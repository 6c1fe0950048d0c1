#![forbid(unsafe_code)]

//! Logging setup.
//!
//! The pipeline only emits `tracing` events; installing a subscriber is the
//! host's call. With the `tracing-json` feature, [`init_json_logging`]
//! installs a JSON formatter filtered by the `GLIDE_LOG` variable
//! (`EnvFilter` syntax, e.g. `glide_core=debug`).

/// Variable holding the log filter directive.
pub const LOG_ENV: &str = "GLIDE_LOG";

/// Directive used when [`LOG_ENV`] is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Install a global JSON subscriber.
///
/// Fails if a global subscriber is already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
}
