//! Metrics collection and exposition.
//!
//! # Metrics
//! - `whois_lookups_total` (counter): lookups by format and response status
//! - `whois_lookup_duration_seconds` (histogram): end-to-end latency
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished lookup (preflights are not counted).
pub fn record_lookup(format: &'static str, status: u16, start_time: Instant) {
    metrics::counter!(
        "whois_lookups_total",
        "format" => format,
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!("whois_lookup_duration_seconds", "format" => format)
        .record(start_time.elapsed().as_secs_f64());
}
