//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_decisions_total` (counter): decisions by outcome
//! - `edge_requests_total` (counter): requests by method, status
//! - `edge_request_duration_seconds` (histogram): latency distribution
//! - `edge_upstream_errors_total` (counter): failed forwards to the renderer

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_decision(outcome: &'static str) {
    ::metrics::counter!("edge_decisions_total", "outcome" => outcome).increment(1);
}

pub fn record_request(method: &str, status: u16, start_time: Instant) {
    ::metrics::counter!(
        "edge_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("edge_request_duration_seconds")
        .record(start_time.elapsed().as_secs_f64());
}

pub fn record_upstream_error() {
    ::metrics::counter!("edge_upstream_errors_total").increment(1);
}
