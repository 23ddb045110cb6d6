//! # Vault Configuration
//!
//! Vault client settings loaded from environment variables.

use crate::constants::{
    DEFAULT_CLUSTER_NAME, DEFAULT_VAULT_ADDR, DEFAULT_VAULT_REQUEST_TIMEOUT_SECS,
};
use zeroize::Zeroizing;

/// Vault client configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Clone)]
pub struct VaultConfig {
    /// Vault API address, without trailing slash
    pub address: String,
    /// Token sent as `X-Vault-Token`
    pub token: Zeroizing<String>,
    /// Vault Enterprise namespace, sent as `X-Vault-Namespace` when set
    pub namespace: Option<String>,
    /// Timeout for a single Vault request (seconds)
    pub request_timeout_secs: u64,
    /// Accept invalid TLS certificates (development clusters only)
    pub skip_verify: bool,
    /// Cluster segment used in policy names
    pub cluster_name: String,
}

impl std::fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultConfig")
            .field("address", &self.address)
            .field("token", &"<redacted>")
            .field("namespace", &self.namespace)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("skip_verify", &self.skip_verify)
            .field("cluster_name", &self.cluster_name)
            .finish()
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_VAULT_ADDR.to_string(),
            token: Zeroizing::new(String::new()),
            namespace: None,
            request_timeout_secs: DEFAULT_VAULT_REQUEST_TIMEOUT_SECS,
            skip_verify: false,
            cluster_name: DEFAULT_CLUSTER_NAME.to_string(),
        }
    }
}

impl VaultConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let address = lookup("VAULT_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_VAULT_ADDR.to_string());

        Self {
            address: address.trim().trim_end_matches('/').to_string(),
            token: Zeroizing::new(lookup("VAULT_TOKEN").unwrap_or_default()),
            namespace: lookup("VAULT_NAMESPACE").filter(|v| !v.is_empty()),
            request_timeout_secs: var_or_default(
                &lookup,
                "VAULT_REQUEST_TIMEOUT_SECS",
                DEFAULT_VAULT_REQUEST_TIMEOUT_SECS,
            ),
            skip_verify: var_or_default(&lookup, "VAULT_SKIP_VERIFY", false),
            cluster_name: lookup("CLUSTER_NAME")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_CLUSTER_NAME.to_string()),
        }
    }

    /// Set the token, e.g. from a CLI flag
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Zeroizing::new(token.into());
        self
    }

    /// Set the address, e.g. from a CLI flag
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into().trim_end_matches('/').to_string();
        self
    }
}

/// Read variable or return default value
fn var_or_default<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
