//! Structured logging setup.
//!
//! Library code logs through `tracing` (and `log` in the storage adapters,
//! bridged by the subscriber). Only the binary installs a subscriber.

use tracing_subscriber::{fmt, EnvFilter};

/// Builds the filter: `RUST_LOG` when set and valid, else `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(default_level).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

/// Installs the global fmt subscriber, writing to stderr so command output on
/// stdout stays clean. Does nothing if a subscriber is already installed.
pub fn init(default_level: &str) {
    let _ = fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
