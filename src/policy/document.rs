//! # Policy Document
//!
//! Vault ACL policy model and its rendering to Vault's HCL policy syntax.

use crate::crd::EngineKind;
use std::fmt::{self, Write};

/// Vault ACL capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Create,
    Read,
    Update,
    Delete,
    List,
    Sudo,
    Deny,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::Create => "create",
            Capability::Read => "read",
            Capability::Update => "update",
            Capability::Delete => "delete",
            Capability::List => "list",
            Capability::Sudo => "sudo",
            Capability::Deny => "deny",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `path "<pattern>" { capabilities = [...] }` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRule {
    pub path: String,
    /// Rendered in this order
    pub capabilities: Vec<Capability>,
}

impl PathRule {
    pub fn new(path: impl Into<String>, capabilities: &[Capability]) -> Self {
        Self {
            path: path.into(),
            capabilities: capabilities.to_vec(),
        }
    }
}

/// Ordered set of path rules making up one ACL policy
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PolicyDocument {
    pub rules: Vec<PathRule>,
}

impl PolicyDocument {
    pub fn new(rules: Vec<PathRule>) -> Self {
        Self { rules }
    }

    /// Fixed rule set for an engine kind mounted at `mount_path`
    pub fn for_engine(kind: EngineKind, mount_path: &str) -> Self {
        Self::new(
            super::template::rules_for(kind)
                .iter()
                .map(|template| template.instantiate(mount_path))
                .collect(),
        )
    }

    /// Render to Vault policy text.
    ///
    /// The text starts with a newline, each block ends with a newline and blocks
    /// are separated by one blank line. Existing deployments compare this text
    /// byte-for-byte, so the layout must not change.
    pub fn render(&self) -> String {
        let mut out = String::from("\n");
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let capabilities = rule
                .capabilities
                .iter()
                .map(|c| format!("\"{c}\""))
                .collect::<Vec<_>>()
                .join(", ");
            // Writing to a String cannot fail
            let _ = write!(
                out,
                "path \"{}\" {{\n\tcapabilities = [{}]\n}}\n",
                rule.path, capabilities
            );
        }
        out
    }
}

impl fmt::Display for PolicyDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GCP_POLICY: &str = r#"
path "gcp/config" {
	capabilities = ["create", "update", "read", "delete"]
}

path "gcp/roleset/*" {
	capabilities = ["create", "update", "read", "delete"]
}

path "gcp/token/*" {
	capabilities = ["create", "update", "read"]
}

path "gcp/key/*" {
	capabilities = ["create", "update", "read"]
}
"#;

    const MY_GCP_PATH_POLICY: &str = r#"
path "my-gcp-path/config" {
	capabilities = ["create", "update", "read", "delete"]
}

path "my-gcp-path/roleset/*" {
	capabilities = ["create", "update", "read", "delete"]
}

path "my-gcp-path/token/*" {
	capabilities = ["create", "update", "read"]
}

path "my-gcp-path/key/*" {
	capabilities = ["create", "update", "read"]
}
"#;

    const AWS_POLICY: &str = r#"
path "aws/config/root" {
	capabilities = ["create", "update", "read", "delete"]
}

path "aws/config/lease" {
	capabilities = ["create", "update", "read", "delete"]
}

path "aws/roles/*" {
	capabilities = ["create", "update", "read", "delete"]
}

path "aws/creds/*" {
	capabilities = ["create", "update", "read"]
}

path "aws/sts/*" {
	capabilities = ["create", "update", "read"]
}

path "sys/leases/revoke/*" {
	capabilities = ["update"]
}
"#;

    const AZURE_POLICY: &str = r#"
path "azure/config" {
	capabilities = ["create", "update", "read", "delete"]
}

path "azure/roles/*" {
	capabilities = ["create", "update", "read", "delete"]
}

path "azure/creds/*" {
	capabilities = ["create", "update", "read"]
}

path "sys/leases/revoke/*" {
	capabilities = ["update"]
}
"#;

    const DATABASE_POLICY: &str = r#"
path "team/db/config/*" {
	capabilities = ["create", "update", "read", "delete"]
}

path "team/db/roles/*" {
	capabilities = ["create", "update", "read", "delete"]
}

path "team/db/creds/*" {
	capabilities = ["create", "update", "read"]
}

path "sys/leases/revoke/*" {
	capabilities = ["update"]
}
"#;

    #[test]
    fn test_render_gcp_default_path() {
        let document = PolicyDocument::for_engine(EngineKind::Gcp, "gcp");
        assert_eq!(document.render(), GCP_POLICY);
    }

    #[test]
    fn test_render_gcp_custom_path() {
        let document = PolicyDocument::for_engine(EngineKind::Gcp, "my-gcp-path");
        assert_eq!(document.render(), MY_GCP_PATH_POLICY);
    }

    #[test]
    fn test_render_is_deterministic() {
        for kind in EngineKind::ALL {
            for path in ["gcp", "aws", "team/a/engine", "x"] {
                let first = PolicyDocument::for_engine(kind, path).render();
                let second = PolicyDocument::for_engine(kind, path).render();
                assert_eq!(first, second, "rendering {kind} at {path} must be stable");
            }
        }
    }

    #[test]
    fn test_render_aws() {
        let document = PolicyDocument::for_engine(EngineKind::Aws, "aws");
        assert_eq!(document.render(), AWS_POLICY);
    }

    #[test]
    fn test_render_azure() {
        let document = PolicyDocument::for_engine(EngineKind::Azure, "azure");
        assert_eq!(document.render(), AZURE_POLICY);
    }

    #[test]
    fn test_render_database_custom_path() {
        let document = PolicyDocument::for_engine(EngineKind::Database, "team/db");
        assert_eq!(document.render(), DATABASE_POLICY);
    }

    #[test]
    fn test_render_custom_rules() {
        let document = PolicyDocument::new(vec![PathRule::new(
            "secret/*",
            &[Capability::List, Capability::Sudo, Capability::Deny],
        )]);
        assert_eq!(
            document.to_string(),
            "\npath \"secret/*\" {\n\tcapabilities = [\"list\", \"sudo\", \"deny\"]\n}\n"
        );
    }

    #[test]
    fn test_render_empty_document() {
        assert_eq!(PolicyDocument::default().render(), "\n");
    }
}
