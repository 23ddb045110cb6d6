//! # Operator Configuration
//!
//! Vault connection settings loaded from environment variables.
//!
//! All configuration has sensible defaults and can be overridden via environment variables.
//! Environment variables are populated from a ConfigMap/Secret using `envFrom` in the deployment.

mod vault;

pub use vault::VaultConfig;

/// Load configuration from environment variables with defaults
pub fn load_config() -> VaultConfig {
    VaultConfig::from_env()
}
