//! # Secret Engine Operator
//!
//! Policy synthesis for Vault secret engines provisioned from `SecretEngine`
//! custom resources.
//!
//! ## Overview
//!
//! For every `SecretEngine` the operator mounts in Vault, it also needs a Vault
//! ACL policy that lets the operator manage that mount. This crate:
//!
//! 1. **Models the CRD** - `SecretEngine` with exactly one backend (GCP, AWS, Azure, Database)
//! 2. **Renders policies** - a fixed rule template per engine kind, parameterised by mount path
//! 3. **Applies policies** - `PUT /v1/sys/policies/acl/{name}` through a pluggable Vault client
//!
//! The reconciliation loop, Vault authentication and admission webhooks live
//! outside this crate. They hand us a resolved `SecretEngine` and an
//! authenticated client, and retry on error.

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod error;
pub mod observability;
pub mod policy;
pub mod vault;

// Re-export CRD types for convenience
pub use crd::*;
pub use error::PolicyError;
