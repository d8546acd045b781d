//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, cache result
//! - `proxy_request_duration_seconds` (histogram): end-to-end latency
//! - `proxy_origin_fetches_total` (counter): origin fetches by outcome
//! - `proxy_origin_fetch_duration_seconds` (histogram): origin latency
//! - `proxy_cache_entries` (gauge): entries currently stored
//! - `proxy_cache_swept_total` (counter): entries removed by the sweeper
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, cache: &'static str, start: Instant) {
    counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "cache" => cache,
    )
    .increment(1);
    histogram!("proxy_request_duration_seconds", "cache" => cache)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_origin_fetch(outcome: &'static str, start: Instant) {
    counter!("proxy_origin_fetches_total", "outcome" => outcome).increment(1);
    histogram!("proxy_origin_fetch_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_cache_size(entries: usize) {
    gauge!("proxy_cache_entries").set(entries as f64);
}

pub fn record_sweep(removed: usize) {
    counter!("proxy_cache_swept_total").increment(removed as u64);
}
