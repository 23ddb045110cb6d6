//! # Metrics Module
//!
//! Prometheus metrics for monitoring policy synthesis.
//!
//! ## Sub-modules
//!
//! - `registry` - Metrics registry setup, registration and text exposition
//! - `policy_metrics` - Policy apply/delete counters and durations

pub mod policy_metrics;
pub mod registry;

pub use policy_metrics::*;
pub use registry::*;
