//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by handler and status
//! - `gateway_request_duration_seconds` (histogram): latency by handler
//! - `gateway_auth_total` (counter): authentication outcomes
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - The Prometheus listener is optional and off by default

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "gateway_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "gateway_request_duration_seconds";
pub const AUTH_TOTAL: &str = "gateway_auth_total";

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    describe_counter!(REQUESTS_TOTAL, "Requests handled, by handler and status");
    describe_histogram!(
        REQUEST_DURATION_SECONDS,
        "Time from dispatch to response, by handler"
    );
    describe_counter!(AUTH_TOTAL, "Authentication outcomes");

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one dispatched request.
pub fn record_request(handler: &'static str, status: u16, start: Instant) {
    counter!(REQUESTS_TOTAL, "handler" => handler, "status" => status.to_string()).increment(1);
    histogram!(REQUEST_DURATION_SECONDS, "handler" => handler)
        .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of one authentication decision.
pub fn record_auth(outcome: &'static str) {
    counter!(AUTH_TOTAL, "outcome" => outcome).increment(1);
}
