//! # Error Policy
//!
//! Requeue decisions for policy errors, for use in the reconciler's error handler.
//!
//! Configuration errors will not fix themselves, so the resource waits for its
//! next spec change. Everything else is retried with Fibonacci backoff tracked
//! per resource.

use crate::controller::backoff::FibonacciBackoff;
use crate::error::PolicyError;
use std::time::Duration;
use tracing::{info, warn};

/// Minimum backoff between retries (minutes)
const MIN_BACKOFF_MINUTES: u64 = 1;
/// Maximum backoff between retries (minutes)
const MAX_BACKOFF_MINUTES: u64 = 10;

/// How long to wait before reconciling again after `error`
///
/// `error_count` is the number of consecutive failures for this resource
/// (0-indexed). Returns `None` when retrying cannot help.
pub fn requeue_delay(error: &PolicyError, error_count: u32) -> Option<Duration> {
    if let PolicyError::Configuration(message) = error {
        warn!(
            "Not requeueing: {} (waiting for the SecretEngine to change)",
            message
        );
        return None;
    }

    let delay = FibonacciBackoff::calculate_for_error_count(
        error_count,
        MIN_BACKOFF_MINUTES,
        MAX_BACKOFF_MINUTES,
    );
    info!(
        "🔄 Retrying with Fibonacci backoff: {}s (error count: {}, reason: {}, transient: {})",
        delay.as_secs(),
        error_count,
        error.as_str(),
        error.is_transient()
    );
    Some(delay)
}
