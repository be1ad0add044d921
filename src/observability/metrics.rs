//! Metrics collection and exposition.
//!
//! # Metrics
//! - `pii_shield_rate_limited_total` (counter): rejections by policy
//! - `pii_shield_rate_limit_records` (gauge): tracked keys per policy after a sweep
//! - `pii_shield_codec_operations_total` (counter): encrypt/decrypt by outcome

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_rate_limited(policy: &str) {
    counter!("pii_shield_rate_limited_total", "policy" => policy.to_string()).increment(1);
}

pub fn record_tracked_keys(policy: &str, count: usize) {
    gauge!("pii_shield_rate_limit_records", "policy" => policy.to_string()).set(count as f64);
}

pub fn record_codec_operation(operation: &'static str, outcome: &'static str) {
    counter!(
        "pii_shield_codec_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
