//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatches by outcome
//!   (`responded`, `not_found`, `stalled`, `no_response`)
//! - `router_dispatch_duration_seconds` (histogram): resolve + chain latency
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter is opt-in via `observability.metrics_enabled`

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished dispatch.
pub fn record_dispatch(outcome: &'static str, start: Instant) {
    metrics::counter!("router_dispatch_total", "outcome" => outcome).increment(1);
    metrics::histogram!("router_dispatch_duration_seconds").record(start.elapsed().as_secs_f64());
}
