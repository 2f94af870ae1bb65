//! Prometheus metrics helpers for the wikisieve daemon.
//!
//! Centralizes recorder initialization and the metric descriptions used
//! across the pipeline, plus the HTTP server for the `/metrics` endpoint.
//!
//! # Metric Naming Conventions
//!
//! - Prefix: pipeline stage (`stream_`, `filter_`, `payload_`, `deliveries_`)
//! - Suffix: unit or type (`_total`)
//! - Labels: avoided; the pipeline is single-stream so cardinality is flat

use axum::{Router, routing::get};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;

/// Initialize the Prometheus metrics recorder.
///
/// Must be called once at startup before any metrics are recorded. Returns
/// a handle for [`start_metrics_server`].
///
/// # Panics
///
/// Panics if called more than once (the recorder can only be installed once).
pub fn init_metrics() -> PrometheusHandle {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    register_common_metrics();

    handle
}

/// Like [`init_metrics`] but returns `None` if a recorder is already
/// installed, instead of panicking. Useful for tests.
pub fn try_init_metrics() -> Option<PrometheusHandle> {
    PrometheusBuilder::new().install_recorder().ok()
}

/// Start the Prometheus metrics HTTP server.
///
/// Serves the `/metrics` endpoint on the given port. Binds eagerly so a
/// port conflict fails startup, then serves from a background task.
pub async fn start_metrics_server(
    port: u16,
    handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Metrics server listening on http://{}/metrics", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Metrics server exited: {}", e);
        }
    });

    Ok(())
}

/// Register descriptions for the pipeline metrics.
///
/// Called automatically by [`init_metrics`].
fn register_common_metrics() {
    describe_counter!(
        "stream_records_seen_total",
        "Raw records received from the event stream, heartbeats included"
    );
    describe_counter!(
        "stream_decode_failures_total",
        "Non-empty records that failed to decode as JSON"
    );
    describe_counter!(
        "stream_reconnects_total",
        "Stream connection attempts after a failure or stream end"
    );

    describe_counter!(
        "filter_rejected_total",
        "Decoded events that did not qualify as significant human edits"
    );
    describe_counter!(
        "candidates_total",
        "Events that passed the filter and entered payload construction"
    );
    describe_counter!(
        "payload_rejected_total",
        "Candidates rejected by payload contract validation"
    );

    describe_counter!(
        "deliveries_ok_total",
        "Payloads accepted by the downstream endpoint (2xx)"
    );
    describe_counter!(
        "deliveries_failed_total",
        "Payloads rejected downstream or lost to transport failures"
    );
    describe_counter!(
        "deliveries_stored_total",
        "Deliveries the downstream endpoint reported as persisted"
    );
    describe_counter!(
        "deliveries_not_stored_total",
        "Deliveries the downstream endpoint reported as not persisted"
    );

    describe_gauge!(
        "ingest_running",
        "Whether the ingestion loop is running (1=yes, 0=no)"
    );
}
