//! Tracing bootstrap for embedders that do not install their own subscriber.

use crate::error::{KanbanError, Result};
use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber filtered by `default_filter`.
///
/// A non-empty, valid `RUST_LOG` takes precedence over `default_filter`.
/// Returns `Ok(true)` if this call installed the subscriber and `Ok(false)`
/// if one was already set.
///
/// # Errors
/// Returns `ConfigError` when `default_filter` is not a valid filter.
pub fn init_tracing(default_filter: &str) -> Result<bool> {
    let configured = EnvFilter::try_new(default_filter).map_err(|err| {
        KanbanError::ConfigError(format!("invalid log filter `{default_filter}`: {err}"))
    })?;

    let filter = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or(configured);

    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok())
}
