//! # Request Types
//!
//! Vault policy API request bodies.

use serde::Serialize;

/// Request body for `PUT /v1/sys/policies/acl/{name}`
///
/// API Reference: https://developer.hashicorp.com/vault/api-docs/system/policies#create-update-acl-policy
#[derive(Debug, Serialize)]
pub struct PolicyRequest<'a> {
    /// Policy document in Vault's HCL policy syntax
    pub policy: &'a str,
}

impl<'a> PolicyRequest<'a> {
    pub fn new(policy: &'a str) -> Self {
        Self { policy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_request_body() {
        let body = serde_json::to_value(PolicyRequest::new("\npath \"gcp/config\" {}\n"))
            .expect("serialize");
        assert_eq!(body, serde_json::json!({ "policy": "\npath \"gcp/config\" {}\n" }));
    }
}
