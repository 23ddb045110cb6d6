//! # SecretEngine Status
//!
//! Status types for tracking policy state and conditions.

use crate::error::PolicyError;
use crate::policy::EnginePolicy;
use serde::{Deserialize, Serialize};

/// Phase reported once the policy is in Vault
pub const PHASE_READY: &str = "Ready";
/// Phase reported when the policy could not be applied
pub const PHASE_FAILED: &str = "Failed";

/// Status of the SecretEngine resource
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretEngineStatus {
    /// Current phase
    /// Values: Ready, Failed
    #[serde(default)]
    pub phase: Option<String>,
    /// Conditions represent the latest available observations
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Observed generation
    #[serde(default)]
    pub observed_generation: Option<i64>,
    /// Name of the Vault ACL policy managed for this engine
    #[serde(default)]
    pub policy_name: Option<String>,
    /// Mount path the policy grants access to
    #[serde(default)]
    pub mount_path: Option<String>,
}

/// Condition represents a condition of a resource
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition
    pub r#type: String,
    /// Status of the condition (True, False, Unknown)
    pub status: String,
    /// Last transition time
    #[serde(default)]
    pub last_transition_time: Option<String>,
    /// Reason for the condition
    #[serde(default)]
    pub reason: Option<String>,
    /// Message describing the condition
    #[serde(default)]
    pub message: Option<String>,
}

impl SecretEngineStatus {
    /// Status after a policy was written to Vault
    pub fn policy_applied(applied: &EnginePolicy, observed_generation: Option<i64>) -> Self {
        Self {
            phase: Some(PHASE_READY.to_string()),
            conditions: vec![Condition {
                r#type: "PolicyReady".to_string(),
                status: "True".to_string(),
                last_transition_time: Some(chrono::Utc::now().to_rfc3339()),
                reason: Some("PolicyApplied".to_string()),
                message: Some(format!(
                    "Policy {} grants access to {} secret engine at {}",
                    applied.name, applied.kind, applied.mount_path
                )),
            }],
            observed_generation,
            policy_name: Some(applied.name.clone()),
            mount_path: Some(applied.mount_path.clone()),
        }
    }

    /// Status after applying the policy failed
    pub fn policy_failed(error: &PolicyError, observed_generation: Option<i64>) -> Self {
        let reason = match error {
            PolicyError::Configuration(_) => "InvalidConfiguration",
            PolicyError::Apply { .. } => "VaultRejectedPolicy",
            PolicyError::Transport(_) => "VaultUnreachable",
        };
        Self {
            phase: Some(PHASE_FAILED.to_string()),
            conditions: vec![Condition {
                r#type: "PolicyReady".to_string(),
                status: "False".to_string(),
                last_transition_time: Some(chrono::Utc::now().to_rfc3339()),
                reason: Some(reason.to_string()),
                message: Some(error.to_string()),
            }],
            observed_generation,
            policy_name: None,
            mount_path: None,
        }
    }

    /// Whether the status already reflects `other`, ignoring transition times.
    /// Used to skip status patches that would only bump timestamps.
    pub fn is_equivalent(&self, other: &SecretEngineStatus) -> bool {
        let strip = |conditions: &[Condition]| {
            conditions
                .iter()
                .map(|c| (c.r#type.clone(), c.status.clone(), c.reason.clone(), c.message.clone()))
                .collect::<Vec<_>>()
        };
        self.phase == other.phase
            && self.observed_generation == other.observed_generation
            && self.policy_name == other.policy_name
            && self.mount_path == other.mount_path
            && strip(&self.conditions) == strip(&other.conditions)
    }
}
