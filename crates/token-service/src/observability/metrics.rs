//! Metrics definitions for the token service
//!
//! All metrics follow Prometheus naming conventions:
//! - `token_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `status`: 2 values (success, error)
//! - `error_category`: 4 values (none, validation, configuration, signing)
//! - `result`: 2 values (ready, not_ready)
//!
//! Room and participant names are never used as labels.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus recorder and return the handle used by
/// `/metrics`.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    builder()?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

/// Build a recorder handle without installing it globally.
///
/// Used when a recorder is already installed in the process (tests spawning
/// several servers).
pub fn standalone_metrics_handle() -> Result<PrometheusHandle, String> {
    Ok(builder()?.build_recorder().handle())
}

fn builder() -> Result<PrometheusBuilder, String> {
    PrometheusBuilder::new()
        // Issuance is a local HMAC, so sub-millisecond buckets matter most
        .set_buckets_for_metric(
            Matcher::Prefix("token_issuance".to_string()),
            &[
                0.0005, 0.001, 0.0025, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set token issuance buckets: {e}"))
}

/// Record token issuance duration and outcome
///
/// Metric: `token_issuance_duration_seconds`, `token_issuance_total`
/// Labels: `status`, `error_category`
pub fn record_token_issuance(status: &str, error_category: Option<&str>, duration: Duration) {
    let category = error_category.unwrap_or("none");

    histogram!("token_issuance_duration_seconds", "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("token_issuance_total", "status" => status.to_string(), "error_category" => category.to_string())
        .increment(1);
}

/// Record a readiness probe result
///
/// Metric: `token_readiness_checks_total`
/// Labels: `result`
pub fn record_readiness_check(result: &str) {
    counter!("token_readiness_checks_total", "result" => result.to_string()).increment(1);
}
