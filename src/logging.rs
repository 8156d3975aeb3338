//! Subscriber setup for host binaries.
//!
//! The library crates only emit `tracing` spans and events. Installing a
//! subscriber is left to the process embedding them; this helper wires the
//! same fmt layer used by our services.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingYamlConfig;

#[derive(Debug, Error)]
pub enum LoggingInitError {
    #[error("invalid log filter `{filter}`: {message}")]
    Filter { filter: String, message: String },

    #[error("global subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Installs a global fmt subscriber.
///
/// `RUST_LOG`, when set, overrides `filter`. Calling this twice returns
/// [`LoggingInitError::AlreadyInstalled`].
pub fn init_tracing(filter: &str, json: bool) -> Result<(), LoggingInitError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(env_filter) => env_filter,
        Err(_) => EnvFilter::try_new(filter).map_err(|err| LoggingInitError::Filter {
            filter: filter.to_string(),
            message: err.to_string(),
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|err| LoggingInitError::AlreadyInstalled(err.to_string()))
}

/// [`init_tracing`] driven by the `logging` section of a config file.
pub fn init_tracing_from_config(config: &LoggingYamlConfig) -> Result<(), LoggingInitError> {
    init_tracing(&config.level, config.json)
}
