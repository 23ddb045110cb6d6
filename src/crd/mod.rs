//! # Custom Resource Definitions
//!
//! CRD types for the secret engine operator.
//!
//! This module contains the `SecretEngine` custom resource, its backend
//! configuration union and its status.

mod engine;
mod status;

pub use engine::*;
pub use status::*;

use crate::constants::DEFAULT_NAMESPACE;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// SecretEngine Custom Resource Definition
///
/// Describes a Vault secret engine to mount and the backend it talks to.
///
/// # Example
///
/// ```yaml
/// apiVersion: engine.kubevault.com/v1alpha1
/// kind: SecretEngine
/// metadata:
///   name: gcpse
///   namespace: demo
/// spec:
///   vaultRef:
///     name: vault
///   path: my-gcp-path
///   backend:
///     gcp:
///       credentialSecret: gcp-cred
/// ```
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "SecretEngine",
    group = "engine.kubevault.com",
    version = "v1alpha1",
    namespaced,
    status = "SecretEngineStatus",
    shortname = "se",
    printcolumn = r#"{"name":"Phase", "type":"string", "jsonPath":".status.phase"}, {"name":"Policy", "type":"string", "jsonPath":".status.policyName"}, {"name":"Path", "type":"string", "jsonPath":".status.mountPath"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct SecretEngineSpec {
    /// Vault instance that hosts the secret engine
    pub vault_ref: VaultRef,
    /// Mount path of the secret engine
    /// Empty means the engine kind's default path ("gcp", "aws", "azure", "database")
    #[serde(default)]
    pub path: String,
    /// Backend configuration - exactly one of gcp, aws, azure or database
    #[serde(default, deserialize_with = "engine::deserialize_backend")]
    #[schemars(with = "Option<SecretEngineConfiguration>")]
    pub backend: Option<SecretEngineConfiguration>,
}

/// Reference to a Vault instance in the resource namespace
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VaultRef {
    /// Name of the Vault server/AppBinding
    #[serde(default)]
    pub name: String,
}

impl SecretEngine {
    /// Kind of the configured backend, if any
    pub fn engine_kind(&self) -> Option<EngineKind> {
        self.spec.backend.as_ref().map(SecretEngineConfiguration::kind)
    }

    /// Namespace of the resource, falling back to "default"
    pub fn namespace_or_default(&self) -> &str {
        self.metadata
            .namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
            .unwrap_or(DEFAULT_NAMESPACE)
    }

    /// Name of the Vault policy that grants access to this engine
    pub fn policy_name(&self, cluster_name: &str) -> String {
        crate::policy::policy_name(
            cluster_name,
            self.namespace_or_default(),
            self.metadata.name.as_deref().unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    #[test]
    fn test_secret_engine_from_yaml() {
        let yaml = r#"
apiVersion: engine.kubevault.com/v1alpha1
kind: SecretEngine
metadata:
  name: gcpse
  namespace: demo
spec:
  vaultRef:
    name: vault
  path: my-gcp-path
  backend:
    gcp:
      credentialSecret: gcp-cred
"#;
        let engine: SecretEngine = serde_yaml::from_str(yaml).expect("valid SecretEngine");
        assert_eq!(engine.spec.vault_ref.name, "vault");
        assert_eq!(engine.spec.path, "my-gcp-path");
        assert_eq!(engine.engine_kind(), Some(EngineKind::Gcp));
        assert_eq!(engine.policy_name("-"), "k8s.-.demo.gcpse");
    }

    #[test]
    fn test_secret_engine_without_backend() {
        let yaml = r#"
apiVersion: engine.kubevault.com/v1alpha1
kind: SecretEngine
metadata:
  name: empty
spec:
  vaultRef:
    name: vault
"#;
        let engine: SecretEngine = serde_yaml::from_str(yaml).expect("backend is optional");
        assert!(engine.spec.path.is_empty());
        assert_eq!(engine.engine_kind(), None);
        assert_eq!(engine.namespace_or_default(), "default");
    }

    #[test]
    fn test_secret_engine_with_two_backends_rejected() {
        let yaml = r#"
apiVersion: engine.kubevault.com/v1alpha1
kind: SecretEngine
metadata:
  name: both
  namespace: demo
spec:
  vaultRef:
    name: vault
  backend:
    gcp: {}
    aws: {}
"#;
        let result: Result<SecretEngine, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_policy_name_uses_cluster() {
        let engine = SecretEngine {
            metadata: ObjectMeta {
                name: Some("awsse".to_string()),
                namespace: Some("team-a".to_string()),
                ..Default::default()
            },
            spec: SecretEngineSpec {
                vault_ref: VaultRef::default(),
                path: String::new(),
                backend: Some(SecretEngineConfiguration::Aws(AwsConfiguration::default())),
            },
            status: None,
        };
        assert_eq!(engine.policy_name("prod"), "k8s.prod.team-a.awsse");
    }
}
