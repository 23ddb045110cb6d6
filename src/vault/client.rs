//! # Vault HTTP Client
//!
//! reqwest-based implementation of [`PolicyApi`] for Vault's
//! `/v1/sys/policies/acl/{name}` endpoint.

use super::requests::PolicyRequest;
use super::PolicyApi;
use crate::config::VaultConfig;
use crate::error::PolicyError;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::debug;
use zeroize::Zeroizing;

const ACL_POLICY_SEGMENTS: [&str; 4] = ["v1", "sys", "policies", "acl"];

/// Vault REST API client authenticated with a token
#[derive(Clone)]
pub struct VaultClient {
    http: reqwest::Client,
    base_url: Url,
    token: Zeroizing<String>,
    namespace: Option<String>,
}

impl std::fmt::Debug for VaultClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultClient")
            .field("base_url", &self.base_url.as_str())
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl VaultClient {
    /// Build the user-agent string from crate version
    fn user_agent() -> String {
        format!("secret-engine-operator/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// `PolicyError::Configuration` if the address is not a valid URL or the
    /// HTTP client cannot be built.
    pub fn new(config: &VaultConfig) -> Result<Self, PolicyError> {
        let base_url = Url::parse(&config.address).map_err(|e| {
            PolicyError::configuration(format!("invalid Vault address '{}': {e}", config.address))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(PolicyError::configuration(format!(
                "invalid Vault address '{}': not a base URL",
                config.address
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(Self::user_agent())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .danger_accept_invalid_certs(config.skip_verify)
            .build()
            .map_err(|e| PolicyError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            token: config.token.clone(),
            namespace: config.namespace.clone(),
        })
    }

    /// Create a client for `address` authenticated with `token`
    ///
    /// # Errors
    ///
    /// See [`VaultClient::new`].
    pub fn with_token(address: &str, token: &str) -> Result<Self, PolicyError> {
        Self::new(&VaultConfig::default().with_address(address).with_token(token))
    }

    /// URL of the ACL policy `name`
    fn policy_url(&self, name: &str) -> Url {
        let mut url = self.base_url.clone();
        // Checked in new(): the base URL can always take path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(ACL_POLICY_SEGMENTS)
                .push(name);
        }
        url
    }

    fn request(&self, method: reqwest::Method, name: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, self.policy_url(name))
            .header("X-Vault-Token", self.token.as_str())
            .header("Accept", "application/json");
        if let Some(namespace) = &self.namespace {
            builder = builder.header("X-Vault-Namespace", namespace);
        }
        builder
    }

    async fn rejected(name: &str, response: reqwest::Response) -> PolicyError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        PolicyError::Apply {
            policy: name.to_string(),
            status,
            body,
        }
    }
}

#[async_trait]
impl PolicyApi for VaultClient {
    async fn put_policy(&self, name: &str, policy: &str) -> Result<(), PolicyError> {
        debug!("PUT Vault ACL policy {}", name);
        let response = self
            .request(reqwest::Method::PUT, name)
            .json(&PolicyRequest::new(policy))
            .send()
            .await
            .map_err(PolicyError::Transport)?;

        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::rejected(name, response).await)
    }

    async fn delete_policy(&self, name: &str) -> Result<(), PolicyError> {
        debug!("DELETE Vault ACL policy {}", name);
        let response = self
            .request(reqwest::Method::DELETE, name)
            .send()
            .await
            .map_err(PolicyError::Transport)?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Err(Self::rejected(name, response).await)
    }
}
