//! # Secret Engine Policies
//!
//! Vault ACL policies granting the operator access to the secret engines it mounts.
//!
//! ## Module Structure
//!
//! - `document.rs` - Capabilities, path rules, and rendering to Vault policy text
//! - `template.rs` - Fixed rule templates per engine kind
//! - `name.rs` - Policy name derivation
//! - `builder.rs` - Render and apply a policy for a `SecretEngine`

mod builder;
mod document;
mod name;
mod template;

// Re-export public API
pub use builder::{kinds_named_by_path, resolve_mount_path, EnginePolicy, PolicyBuilder};
pub use document::{Capability, PathRule, PolicyDocument};
pub use name::{policy_name, sanitize_segment};
