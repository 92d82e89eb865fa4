//! Metrics collection and exposition.
//!
//! # Metrics
//! - `outbound_requests_total` (counter): outbound calls by service key, method, outcome
//! - `outbound_request_duration_seconds` (histogram): outbound call latency
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Outcome label is "success" or the error kind, never the error text

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::HttpError;

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one outbound call.
pub fn record_outbound_call(
    service_key: &str,
    method: &str,
    outcome: Result<(), &HttpError>,
    start: Instant,
) {
    let outcome = match outcome {
        Ok(()) => "success",
        Err(e) => e.kind(),
    };
    let elapsed = start.elapsed().as_secs_f64();

    ::metrics::counter!(
        "outbound_requests_total",
        "service" => service_key.to_string(),
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!(
        "outbound_request_duration_seconds",
        "service" => service_key.to_string(),
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .record(elapsed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_recorder() {
        let err = HttpError::Timeout(10);
        record_outbound_call("Orders:BaseUrl", "GET", Ok(()), Instant::now());
        record_outbound_call("Orders:BaseUrl", "GET", Err(&err), Instant::now());
    }
}
