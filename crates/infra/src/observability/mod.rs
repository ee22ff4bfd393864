//! Logging setup
//!
//! The sink itself only emits `tracing` events; embedding processes that do
//! not install their own subscriber can call [`init_tracing`].

use tracing_subscriber::EnvFilter;

/// Output format for the fmt subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, one line per event
    #[default]
    Pretty,
    /// One JSON object per event, for log aggregation
    Json,
}

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. Calling this more than
/// once is harmless; later calls leave the first subscriber in place and
/// return `false`.
pub fn init_tracing(default_filter: &str, format: LogFormat) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match format {
        LogFormat::Pretty => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().flatten_event(true).try_init().is_ok(),
    };

    if installed {
        tracing::debug!(?format, "tracing initialized");
    }
    installed
}
