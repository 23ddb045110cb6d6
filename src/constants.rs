//! # Constants
//!
//! Default values shared across the operator.

/// Default Vault API address when `VAULT_ADDR` is not set
pub const DEFAULT_VAULT_ADDR: &str = "http://127.0.0.1:8200";

/// Default timeout for a single Vault API request (seconds)
pub const DEFAULT_VAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Placeholder cluster segment of policy names when `CLUSTER_NAME` is not set
pub const DEFAULT_CLUSTER_NAME: &str = "-";

/// Prefix of every policy name managed by the operator
pub const POLICY_NAME_PREFIX: &str = "k8s";

/// Namespace used in policy names when the resource has none
pub const DEFAULT_NAMESPACE: &str = "default";

/// Default tracing filter for the binaries
pub const DEFAULT_LOG_FILTER: &str = "secret_engine_operator=info";
