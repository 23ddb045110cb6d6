//! # Policy Names
//!
//! Vault policy names derived from the owning resource.

use crate::constants::{DEFAULT_CLUSTER_NAME, POLICY_NAME_PREFIX};

/// Build the policy name `k8s.<cluster>.<namespace>.<name>`
///
/// Each segment is sanitized for Vault's policy name charset. An empty cluster
/// renders as `-`, so `demo/gcpse` on an unnamed cluster yields `k8s.-.demo.gcpse`.
pub fn policy_name(cluster_name: &str, namespace: &str, name: &str) -> String {
    let cluster = if cluster_name.trim().is_empty() {
        DEFAULT_CLUSTER_NAME
    } else {
        cluster_name
    };
    format!(
        "{POLICY_NAME_PREFIX}.{}.{}.{}",
        sanitize_segment(cluster),
        sanitize_segment(namespace),
        sanitize_segment(name)
    )
}

/// Lowercase and replace characters outside `[a-z0-9._-]` with `-`
pub fn sanitize_segment(segment: &str) -> String {
    segment
        .trim()
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}
