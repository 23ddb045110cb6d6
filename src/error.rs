//! # Policy Error Types
//!
//! Errors raised while building or applying a secret engine policy, classified
//! as transient (the reconciler should retry) or permanent.

use thiserror::Error;

/// Error building or applying a Vault ACL policy
#[derive(Debug, Error)]
pub enum PolicyError {
    /// No usable backend configuration, or the mount path disagrees with it.
    /// Raised before any request reaches Vault.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Vault answered with a non-2xx status
    #[error("vault rejected policy {policy}: status {status}: {body}")]
    Apply {
        policy: String,
        status: u16,
        body: String,
    },

    /// Vault could not be reached
    #[error("transport error communicating with vault: {0}")]
    Transport(#[source] reqwest::Error),
}

impl PolicyError {
    pub fn configuration(message: impl Into<String>) -> Self {
        PolicyError::Configuration(message.into())
    }

    /// Determine if this error is transient (should retry) or permanent
    pub fn is_transient(&self) -> bool {
        match self {
            PolicyError::Configuration(_) => false,
            PolicyError::Apply { status, .. } => *status == 429 || *status >= 500,
            PolicyError::Transport(_) => true,
        }
    }

    /// Get reason string for metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyError::Configuration(_) => "configuration",
            PolicyError::Apply { .. } => "apply",
            PolicyError::Transport(_) => "transport",
        }
    }

    /// HTTP status returned by Vault, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            PolicyError::Apply { status, .. } => Some(*status),
            PolicyError::Transport(e) => e.status().map(|s| s.as_u16()),
            PolicyError::Configuration(_) => None,
        }
    }
}
