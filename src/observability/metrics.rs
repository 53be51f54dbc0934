//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, rule
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_rule_table_reloads_total` (counter): config reloads by outcome
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Rule label records which rewrite rule handled the request, "none" for
//!   unmatched requests

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Starts the Prometheus scrape endpoint. Failure to bind is logged, not
/// fatal; the gateway keeps serving without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Records one completed request.
pub fn record_request(method: &str, status: u16, rule: &str, start_time: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "rule" => rule.to_string(),
    )
    .increment(1);
    metrics::histogram!(
        "gateway_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "rule" => rule.to_string(),
    )
    .record(start_time.elapsed().as_secs_f64());
}

/// Records one rule table reload attempt.
pub fn record_reload(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("gateway_rule_table_reloads_total", "outcome" => outcome).increment(1);
}
