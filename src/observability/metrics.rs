//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, endpoint
//! - `gateway_request_duration_seconds` (histogram): latency by endpoint
//! - `gateway_upstream_requests_total` (counter): datastore calls by method, outcome
//! - `gateway_reference_lookups_total` (counter): KEGG lookups by kind, outcome
//!
//! Recording is a no-op until a recorder is installed by `init_metrics`.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, endpoint: &str, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "endpoint" => endpoint.to_string()
    )
    .increment(1);
    histogram!(
        "gateway_request_duration_seconds",
        "endpoint" => endpoint.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream(method: &str, outcome: &'static str) {
    counter!(
        "gateway_upstream_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_reference_lookup(kind: &str, outcome: &'static str) {
    counter!(
        "gateway_reference_lookups_total",
        "kind" => kind.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
