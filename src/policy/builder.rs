//! # Policy Builder
//!
//! Renders the ACL policy for a `SecretEngine` and writes it to Vault.
//!
//! Rendering is pure. The only side effect is a single policy write (or delete)
//! through the `PolicyApi` client the builder was constructed with. Retries are
//! left to the reconciliation loop.

use super::document::PolicyDocument;
use crate::crd::{EngineKind, SecretEngine};
use crate::error::PolicyError;
use crate::observability::metrics;
use crate::vault::PolicyApi;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

/// Characters that would break the rendered policy text or change glob semantics
const FORBIDDEN_MOUNT_CHARS: &[char] = &['"', '*', '+', '{', '}', '\\'];

/// A rendered policy for one secret engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnginePolicy {
    /// Vault policy name
    pub name: String,
    /// Engine kind the rules were taken from
    pub kind: EngineKind,
    /// Resolved mount path
    pub mount_path: String,
    pub document: PolicyDocument,
}

impl EnginePolicy {
    /// Policy text as sent to Vault
    pub fn rendered(&self) -> String {
        self.document.render()
    }
}

/// Builds and applies secret engine policies against one Vault client
#[derive(Debug, Clone)]
pub struct PolicyBuilder<C> {
    client: C,
    cluster_name: String,
}

impl<C: PolicyApi> PolicyBuilder<C> {
    pub fn new(client: C, cluster_name: impl Into<String>) -> Self {
        Self {
            client,
            cluster_name: cluster_name.into(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Render the policy for `engine` mounted at `path` without touching Vault
    ///
    /// `path` wins over `spec.path`; when both are empty the kind's default path is used.
    ///
    /// # Errors
    ///
    /// `PolicyError::Configuration` when the resource has no name, no backend is
    /// configured, the mount path is invalid, or the mount path names a different
    /// engine kind than the backend.
    pub fn build(&self, engine: &SecretEngine, path: &str) -> Result<EnginePolicy, PolicyError> {
        let name = self.policy_name_for(engine)?;
        let kind = engine.engine_kind().ok_or_else(|| {
            PolicyError::configuration("no supported secret-engine backend configured")
        })?;
        let mount_path = resolve_mount_path(kind, path, &engine.spec.path)?;
        check_kind_matches_path(kind, &mount_path)?;

        Ok(EnginePolicy {
            name,
            kind,
            document: PolicyDocument::for_engine(kind, &mount_path),
            mount_path,
        })
    }

    /// Render the policy and write it to Vault
    ///
    /// Vault's policy write is an upsert, so re-applying the same resource is safe.
    ///
    /// # Errors
    ///
    /// Configuration errors from [`PolicyBuilder::build`] (nothing is sent to Vault),
    /// `PolicyError::Apply` for non-2xx responses and `PolicyError::Transport`
    /// when Vault is unreachable.
    pub async fn apply(
        &self,
        engine: &SecretEngine,
        path: &str,
    ) -> Result<EnginePolicy, PolicyError> {
        let resource_name = engine.metadata.name.as_deref().unwrap_or("unknown");
        let span = info_span!(
            "secret_engine.policy.apply",
            resource.name = resource_name,
            resource.namespace = engine.namespace_or_default(),
            policy.name = tracing::field::Empty,
            engine.kind = tracing::field::Empty,
            mount.path = tracing::field::Empty,
        );
        let span_clone = span.clone();
        let start = Instant::now();

        async move {
            let policy = match self.build(engine, path) {
                Ok(policy) => policy,
                Err(e) => {
                    warn!("Refusing to write policy for {}: {}", resource_name, e);
                    metrics::increment_policy_apply_errors(e.as_str());
                    return Err(e);
                }
            };
            span_clone.record("policy.name", policy.name.as_str());
            span_clone.record("engine.kind", policy.kind.as_str());
            span_clone.record("mount.path", policy.mount_path.as_str());

            let rendered = policy.rendered();
            debug!("Rendered policy {}:{}", policy.name, rendered);

            match self.client.put_policy(&policy.name, &rendered).await {
                Ok(()) => {
                    metrics::record_policy_apply(policy.kind.as_str(), start.elapsed().as_secs_f64());
                    info!(
                        "Applied policy {} for {} secret engine at {}",
                        policy.name, policy.kind, policy.mount_path
                    );
                    Ok(policy)
                }
                Err(e) => {
                    metrics::increment_policy_apply_errors(e.as_str());
                    warn!(
                        error.transient = e.is_transient(),
                        "Failed to apply policy {}: {}", policy.name, e
                    );
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Remove the engine's policy from Vault, e.g. when the resource is deleted
    ///
    /// Deleting a policy that does not exist succeeds.
    ///
    /// # Errors
    ///
    /// `PolicyError::Configuration` if the resource has no name, otherwise
    /// `PolicyError::Apply` or `PolicyError::Transport` from the Vault client.
    pub async fn delete(&self, engine: &SecretEngine) -> Result<(), PolicyError> {
        let name = match self.policy_name_for(engine) {
            Ok(name) => name,
            Err(e) => {
                metrics::increment_policy_delete_errors(e.as_str());
                return Err(e);
            }
        };
        let span = info_span!("secret_engine.policy.delete", policy.name = name.as_str());

        async move {
            match self.client.delete_policy(&name).await {
                Ok(()) => {
                    metrics::increment_policy_deletes();
                    info!("Deleted policy {}", name);
                    Ok(())
                }
                Err(e) => {
                    metrics::increment_policy_delete_errors(e.as_str());
                    warn!("Failed to delete policy {}: {}", name, e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }
}

impl<C> PolicyBuilder<C> {
    /// Policy name for `engine`; a resource without a name cannot own a policy
    fn policy_name_for(&self, engine: &SecretEngine) -> Result<String, PolicyError> {
        match engine.metadata.name.as_deref() {
            Some(name) if !name.trim().is_empty() => Ok(engine.policy_name(&self.cluster_name)),
            _ => Err(PolicyError::configuration(
                "SecretEngine has no metadata.name to derive a policy name from",
            )),
        }
    }
}

/// Pick the mount path: explicit argument, then `spec.path`, then the kind default
///
/// # Errors
///
/// `PolicyError::Configuration` if the chosen path contains whitespace, `..`
/// segments or characters that are not valid in a policy path.
pub fn resolve_mount_path(
    kind: EngineKind,
    path: &str,
    spec_path: &str,
) -> Result<String, PolicyError> {
    let trimmed = |p: &str| p.trim().trim_matches('/').to_string();
    let mount_path = [trimmed(path), trimmed(spec_path)]
        .into_iter()
        .find(|p| !p.is_empty())
        .unwrap_or_else(|| kind.default_path().to_string());

    if mount_path.chars().any(char::is_whitespace) {
        return Err(PolicyError::configuration(format!(
            "mount path '{mount_path}' must not contain whitespace"
        )));
    }
    if let Some(c) = mount_path.chars().find(|c| FORBIDDEN_MOUNT_CHARS.contains(c)) {
        return Err(PolicyError::configuration(format!(
            "mount path '{mount_path}' contains invalid character '{c}'"
        )));
    }
    if mount_path.split('/').any(|segment| segment.is_empty() || segment == "..") {
        return Err(PolicyError::configuration(format!(
            "mount path '{mount_path}' contains an empty or '..' segment"
        )));
    }

    Ok(mount_path)
}

/// Engine kinds named by the tokens of a mount path
///
/// `my-gcp-path` names GCP, `team/aws_engine` names AWS, `secrets` names none.
pub fn kinds_named_by_path(mount_path: &str) -> Vec<EngineKind> {
    let tokens: Vec<&str> = mount_path
        .split(['/', '-', '_', '.'])
        .filter(|t| !t.is_empty())
        .collect();
    EngineKind::ALL
        .into_iter()
        .filter(|kind| {
            tokens
                .iter()
                .any(|t| t.eq_ignore_ascii_case(kind.default_path()))
        })
        .collect()
}

/// Reject a backend targeted at a path that names another engine kind
fn check_kind_matches_path(kind: EngineKind, mount_path: &str) -> Result<(), PolicyError> {
    let named = kinds_named_by_path(mount_path);
    if named.is_empty() || named.contains(&kind) {
        return Ok(());
    }
    let named = named
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Err(PolicyError::configuration(format!(
        "{kind} secret engine configuration cannot be used with mount path '{mount_path}' (path names {named})"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{
        AwsConfiguration, AzureConfiguration, GcpConfiguration, SecretEngineConfiguration,
        SecretEngineSpec, VaultRef,
    };
    use async_trait::async_trait;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::sync::Mutex;

    /// Records every call instead of talking to Vault
    #[derive(Debug, Default)]
    struct RecordingVault {
        puts: Mutex<Vec<(String, String)>>,
        deletes: Mutex<Vec<String>>,
        reject_with: Option<u16>,
    }

    #[async_trait]
    impl PolicyApi for RecordingVault {
        async fn put_policy(&self, name: &str, policy: &str) -> Result<(), PolicyError> {
            self.puts
                .lock()
                .unwrap()
                .push((name.to_string(), policy.to_string()));
            match self.reject_with {
                Some(status) => Err(PolicyError::Apply {
                    policy: name.to_string(),
                    status,
                    body: "rejected".to_string(),
                }),
                None => Ok(()),
            }
        }

        async fn delete_policy(&self, name: &str) -> Result<(), PolicyError> {
            self.deletes.lock().unwrap().push(name.to_string());
            Ok(())
        }
    }

    fn engine(backend: Option<SecretEngineConfiguration>, spec_path: &str) -> SecretEngine {
        SecretEngine {
            metadata: ObjectMeta {
                name: Some("gcpse".to_string()),
                namespace: Some("demo".to_string()),
                ..Default::default()
            },
            spec: SecretEngineSpec {
                vault_ref: VaultRef::default(),
                path: spec_path.to_string(),
                backend,
            },
            status: None,
        }
    }

    fn gcp() -> Option<SecretEngineConfiguration> {
        Some(SecretEngineConfiguration::Gcp(GcpConfiguration::default()))
    }

    fn aws() -> Option<SecretEngineConfiguration> {
        Some(SecretEngineConfiguration::Aws(AwsConfiguration::default()))
    }

    #[test]
    fn test_build_gcp_policy() {
        let builder = PolicyBuilder::new(RecordingVault::default(), "-");
        let policy = builder.build(&engine(gcp(), ""), "gcp").unwrap();
        assert_eq!(policy.name, "k8s.-.demo.gcpse");
        assert_eq!(policy.kind, EngineKind::Gcp);
        assert_eq!(policy.mount_path, "gcp");
        assert_eq!(policy.document.rules.len(), 4);
        assert_eq!(policy.document.rules[1].path, "gcp/roleset/*");
    }

    #[test]
    fn test_build_without_backend_fails() {
        let builder = PolicyBuilder::new(RecordingVault::default(), "-");
        let err = builder.build(&engine(None, ""), "gcp").unwrap_err();
        assert!(matches!(err, PolicyError::Configuration(_)));
        assert!(err
            .to_string()
            .contains("no supported secret-engine backend configured"));
    }

    #[test]
    fn test_build_with_unsupported_backend_object_fails() {
        let builder = PolicyBuilder::new(RecordingVault::default(), "-");
        for backend in ["{}", "{kv: {}}"] {
            let yaml = format!(
                "apiVersion: engine.kubevault.com/v1alpha1\nkind: SecretEngine\nmetadata:\n  name: kvse\n  namespace: demo\nspec:\n  vaultRef:\n    name: vault\n  backend: {backend}\n"
            );
            let se: SecretEngine = serde_yaml::from_str(&yaml).expect("resource still parses");
            assert_eq!(se.engine_kind(), None);

            let err = builder.build(&se, "").unwrap_err();
            assert!(matches!(err, PolicyError::Configuration(_)));
            assert!(err
                .to_string()
                .contains("no supported secret-engine backend configured"));
        }
    }

    #[test]
    fn test_build_without_name_fails() {
        let builder = PolicyBuilder::new(RecordingVault::default(), "-");
        for name in [None, Some(String::new())] {
            let mut se = engine(gcp(), "");
            se.metadata.name = name;
            let err = builder.build(&se, "").unwrap_err();
            assert!(matches!(err, PolicyError::Configuration(_)));
            assert!(err.to_string().contains("metadata.name"));
        }
    }

    #[test]
    fn test_mount_path_rejects_policy_injection() {
        let err = resolve_mount_path(EngineKind::Gcp, "a\" } path \"sys/*", "").unwrap_err();
        assert!(matches!(err, PolicyError::Configuration(_)));
    }

    #[test]
    fn test_build_rejects_kind_path_mismatch() {
        let builder = PolicyBuilder::new(RecordingVault::default(), "-");
        let err = builder.build(&engine(aws(), ""), "my-gcp-path").unwrap_err();
        assert!(matches!(err, PolicyError::Configuration(_)));
    }

    #[test]
    fn test_mount_path_resolution_order() {
        assert_eq!(resolve_mount_path(EngineKind::Gcp, "explicit", "spec").unwrap(), "explicit");
        assert_eq!(resolve_mount_path(EngineKind::Gcp, "", "spec").unwrap(), "spec");
        assert_eq!(resolve_mount_path(EngineKind::Gcp, "", "").unwrap(), "gcp");
        assert_eq!(resolve_mount_path(EngineKind::Azure, " / ", "").unwrap(), "azure");
        assert_eq!(resolve_mount_path(EngineKind::Aws, "/team/aws/", "").unwrap(), "team/aws");
    }

    #[test]
    fn test_mount_path_validation() {
        for bad in ["my path", "gcp\"", "gcp/*", "a//b", "a/../b"] {
            assert!(
                resolve_mount_path(EngineKind::Gcp, bad, "").is_err(),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn test_kinds_named_by_path() {
        assert_eq!(kinds_named_by_path("gcp"), vec![EngineKind::Gcp]);
        assert_eq!(kinds_named_by_path("my-gcp-path"), vec![EngineKind::Gcp]);
        assert_eq!(kinds_named_by_path("team/AWS_creds"), vec![EngineKind::Aws]);
        assert!(kinds_named_by_path("secrets").is_empty());
        assert!(kinds_named_by_path("gcpx").is_empty());
    }

    #[test]
    fn test_path_naming_no_kind_accepts_any_backend() {
        let builder = PolicyBuilder::new(RecordingVault::default(), "-");
        let mut azure = engine(
            Some(SecretEngineConfiguration::Azure(AzureConfiguration::default())),
            "",
        );
        azure.metadata.name = Some("azurese".to_string());
        let policy = builder.build(&azure, "cloud-creds").unwrap();
        assert_eq!(policy.mount_path, "cloud-creds");
        assert_eq!(policy.name, "k8s.-.demo.azurese");
    }

    #[tokio::test]
    async fn test_apply_puts_rendered_policy() {
        let builder = PolicyBuilder::new(RecordingVault::default(), "-");
        let policy = builder.apply(&engine(gcp(), ""), "my-gcp-path").await.unwrap();

        let puts = builder.client().puts.lock().unwrap().clone();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].0, "k8s.-.demo.gcpse");
        assert_eq!(puts[0].1, policy.rendered());
        assert!(puts[0].1.starts_with("\npath \"my-gcp-path/config\" {"));
    }

    #[tokio::test]
    async fn test_apply_configuration_error_sends_nothing() {
        let builder = PolicyBuilder::new(RecordingVault::default(), "-");
        let err = builder.apply(&engine(aws(), ""), "my-gcp-path").await.unwrap_err();
        assert!(matches!(err, PolicyError::Configuration(_)));
        assert!(builder.client().puts.lock().unwrap().is_empty());

        let err = builder.apply(&engine(None, ""), "").await.unwrap_err();
        assert!(matches!(err, PolicyError::Configuration(_)));
        assert!(builder.client().puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_apply_twice_sends_identical_requests() {
        let builder = PolicyBuilder::new(RecordingVault::default(), "-");
        let se = engine(gcp(), "");
        builder.apply(&se, "gcp").await.unwrap();
        builder.apply(&se, "gcp").await.unwrap();

        let puts = builder.client().puts.lock().unwrap().clone();
        assert_eq!(puts.len(), 2);
        assert_eq!(puts[0], puts[1]);
    }

    #[tokio::test]
    async fn test_apply_surfaces_vault_rejection() {
        let vault = RecordingVault {
            reject_with: Some(400),
            ..Default::default()
        };
        let builder = PolicyBuilder::new(vault, "-");
        let err = builder.apply(&engine(gcp(), ""), "gcp").await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_delete_uses_policy_name() {
        let builder = PolicyBuilder::new(RecordingVault::default(), "prod");
        builder.delete(&engine(gcp(), "")).await.unwrap();
        assert_eq!(
            *builder.client().deletes.lock().unwrap(),
            vec!["k8s.prod.demo.gcpse".to_string()]
        );
    }

    #[tokio::test]
    async fn test_delete_without_name_sends_nothing() {
        let builder = PolicyBuilder::new(RecordingVault::default(), "-");
        let mut se = engine(gcp(), "");
        se.metadata.name = None;
        let err = builder.delete(&se).await.unwrap_err();
        assert!(matches!(err, PolicyError::Configuration(_)));
        assert!(builder.client().deletes.lock().unwrap().is_empty());
    }
}
