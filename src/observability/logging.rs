//! # Logging
//!
//! Tracing subscriber setup for the binaries.

use crate::constants::DEFAULT_LOG_FILTER;
use anyhow::Result;

/// Install the global tracing subscriber
///
/// Honors `RUST_LOG`; defaults to `secret_engine_operator=info`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}
