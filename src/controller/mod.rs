//! # Controller Support
//!
//! Pieces the external reconciliation loop plugs in: CRD manifest generation
//! and requeue decisions for policy errors.

pub mod backoff;
pub mod error_policy;

use crate::crd::SecretEngine;
use anyhow::{Context, Result};
use kube::CustomResourceExt;

/// Render the SecretEngine CRD manifest as YAML
#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn crd_yaml() -> Result<String> {
    serde_yaml::to_string(&SecretEngine::crd()).context("Failed to serialize SecretEngine CRD")
}
