//! Logging setup
//!
//! Installs the global `tracing` subscriber used by the binaries and by anyone
//! embedding the crate without their own subscriber.

use crate::config::LoggingConfig;
use crate::utils::error::{GatewayError, Result};
use tracing_subscriber::EnvFilter;

/// Build the filter from `RUST_LOG` when set, otherwise from the configured level
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| GatewayError::Config(format!("Invalid log level '{}': {}", config.level, e))),
    }
}

/// Initialize the global subscriber.
///
/// Returns an error if a subscriber is already installed, so callers that may
/// run more than once (tests) should ignore the result.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_thread_ids(false);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| GatewayError::Config(format!("Failed to install logger: {}", e)))
}
