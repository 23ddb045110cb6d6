//! # Policy Templates
//!
//! Fixed rule templates per engine kind. Only the mount path varies.

use super::document::Capability::{Create, Delete, Read, Update};
use super::document::{Capability, PathRule};
use crate::crd::EngineKind;

const CRUD: &[Capability] = &[Create, Update, Read, Delete];
const CRU: &[Capability] = &[Create, Update, Read];
const U: &[Capability] = &[Update];

/// Path of a template rule
#[derive(Debug, Clone, Copy)]
pub(crate) enum RulePath {
    /// Relative to the engine's mount path
    Mount(&'static str),
    /// Used as-is
    Absolute(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RuleTemplate {
    pub path: RulePath,
    pub capabilities: &'static [Capability],
}

impl RuleTemplate {
    const fn mount(suffix: &'static str, capabilities: &'static [Capability]) -> Self {
        Self {
            path: RulePath::Mount(suffix),
            capabilities,
        }
    }

    const fn absolute(path: &'static str, capabilities: &'static [Capability]) -> Self {
        Self {
            path: RulePath::Absolute(path),
            capabilities,
        }
    }

    pub fn instantiate(&self, mount_path: &str) -> PathRule {
        let path = match self.path {
            RulePath::Mount(suffix) => format!("{mount_path}/{suffix}"),
            RulePath::Absolute(path) => path.to_string(),
        };
        PathRule::new(path, self.capabilities)
    }
}

const GCP_RULES: &[RuleTemplate] = &[
    RuleTemplate::mount("config", CRUD),
    RuleTemplate::mount("roleset/*", CRUD),
    RuleTemplate::mount("token/*", CRU),
    RuleTemplate::mount("key/*", CRU),
];

const AWS_RULES: &[RuleTemplate] = &[
    RuleTemplate::mount("config/root", CRUD),
    RuleTemplate::mount("config/lease", CRUD),
    RuleTemplate::mount("roles/*", CRUD),
    RuleTemplate::mount("creds/*", CRU),
    RuleTemplate::mount("sts/*", CRU),
    RuleTemplate::absolute("sys/leases/revoke/*", U),
];

const AZURE_RULES: &[RuleTemplate] = &[
    RuleTemplate::mount("config", CRUD),
    RuleTemplate::mount("roles/*", CRUD),
    RuleTemplate::mount("creds/*", CRU),
    RuleTemplate::absolute("sys/leases/revoke/*", U),
];

const DATABASE_RULES: &[RuleTemplate] = &[
    RuleTemplate::mount("config/*", CRUD),
    RuleTemplate::mount("roles/*", CRUD),
    RuleTemplate::mount("creds/*", CRU),
    RuleTemplate::absolute("sys/leases/revoke/*", U),
];

/// Rule templates for an engine kind, in render order
pub(crate) fn rules_for(kind: EngineKind) -> &'static [RuleTemplate] {
    match kind {
        EngineKind::Gcp => GCP_RULES,
        EngineKind::Aws => AWS_RULES,
        EngineKind::Azure => AZURE_RULES,
        EngineKind::Database => DATABASE_RULES,
    }
}
