//! # Vault Policy API
//!
//! Minimal client seam for Vault's ACL policy endpoints.
//!
//! The builder only needs to write and delete policies, so that is all this
//! trait exposes. Tests substitute an in-memory implementation or point the
//! HTTP client at a fake server.

mod client;
mod requests;

pub use client::VaultClient;
pub use requests::PolicyRequest;

use crate::error::PolicyError;
use async_trait::async_trait;
use std::sync::Arc;

/// Vault ACL policy operations
#[async_trait]
pub trait PolicyApi: Send + Sync {
    /// Create or replace the policy `name` with `policy` text
    async fn put_policy(&self, name: &str, policy: &str) -> Result<(), PolicyError>;

    /// Delete the policy `name`; deleting a missing policy succeeds
    async fn delete_policy(&self, name: &str) -> Result<(), PolicyError>;
}

#[async_trait]
impl<T: PolicyApi + ?Sized> PolicyApi for Arc<T> {
    async fn put_policy(&self, name: &str, policy: &str) -> Result<(), PolicyError> {
        (**self).put_policy(name, policy).await
    }

    async fn delete_policy(&self, name: &str) -> Result<(), PolicyError> {
        (**self).delete_policy(name).await
    }
}
