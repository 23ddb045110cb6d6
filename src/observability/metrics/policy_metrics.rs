//! # Policy Metrics
//!
//! Metrics for policy operations: applies, deletes, errors and durations.

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::{Histogram, IntCounter, IntCounterVec};
use std::sync::LazyLock;

static POLICY_APPLIES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secret_engine_policy_applies_total",
            "Total number of policies written to Vault",
        ),
        &["kind"],
    )
    .expect("Failed to create POLICY_APPLIES_TOTAL metric - this should never happen")
});

static POLICY_APPLY_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secret_engine_policy_apply_errors_total",
            "Total number of failed policy writes by reason",
        ),
        &["reason"],
    )
    .expect("Failed to create POLICY_APPLY_ERRORS_TOTAL metric - this should never happen")
});

static POLICY_DELETE_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secret_engine_policy_delete_errors_total",
            "Total number of failed policy deletes by reason",
        ),
        &["reason"],
    )
    .expect("Failed to create POLICY_DELETE_ERRORS_TOTAL metric - this should never happen")
});

static POLICY_DELETES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "secret_engine_policy_deletes_total",
        "Total number of policies deleted from Vault",
    )
    .expect("Failed to create POLICY_DELETES_TOTAL metric - this should never happen")
});

static POLICY_APPLY_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "secret_engine_policy_apply_duration_seconds",
            "Duration of successful policy writes in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]),
    )
    .expect("Failed to create POLICY_APPLY_DURATION metric - this should never happen")
});

/// Register policy metrics with the registry
pub(crate) fn register_policy_metrics() -> Result<()> {
    REGISTRY.register(Box::new(POLICY_APPLIES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(POLICY_APPLY_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(POLICY_DELETES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(POLICY_DELETE_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(POLICY_APPLY_DURATION.clone()))?;
    Ok(())
}

/// Record a successful policy write
pub fn record_policy_apply(kind: &str, duration_secs: f64) {
    POLICY_APPLIES_TOTAL.with_label_values(&[kind]).inc();
    POLICY_APPLY_DURATION.observe(duration_secs);
}

pub fn increment_policy_apply_errors(reason: &str) {
    POLICY_APPLY_ERRORS_TOTAL.with_label_values(&[reason]).inc();
}

pub fn increment_policy_deletes() {
    POLICY_DELETES_TOTAL.inc();
}

pub fn increment_policy_delete_errors(reason: &str) {
    POLICY_DELETE_ERRORS_TOTAL.with_label_values(&[reason]).inc();
}
