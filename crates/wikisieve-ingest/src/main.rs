//! wikisieve live ingestion daemon.
//!
//! Entry point for the stream-to-endpoint forwarder. It connects to the
//! recent-changes event stream, filters for significant human edits, and
//! delivers each surviving event to the downstream ingest endpoint,
//! reconnecting with a fixed delay whenever the stream drops.
//!
//! # Usage
//!
//! ```bash
//! # Run with default settings (public stream, local receiver)
//! wikisieve-ingest
//!
//! # Point at a deployed receiver and raise the significance bar
//! WIKISIEVE_INGEST_URL=https://worker.example.com/ingest \
//! WIKISIEVE_THRESHOLD=2000 \
//!     wikisieve-ingest
//! ```
//!
//! The process has no normal exit: it runs until it receives SIGINT or
//! SIGTERM, then drains the current record and logs a final counter
//! summary. Startup aborts immediately on invalid configuration.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use metrics::gauge;
use tracing_subscriber::EnvFilter;

use wikisieve_core::metrics::{init_metrics, start_metrics_server};
use wikisieve_ingest::{Config, Supervisor};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("info".parse().context("default log directive")?)
                .add_directive(
                    "wikisieve_ingest=debug"
                        .parse()
                        .context("crate log directive")?,
                ),
        )
        .init();

    tracing::info!("wikisieve ingestion daemon starting...");

    // Configuration must resolve before anything connects.
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize metrics
    if config.metrics_port > 0 {
        let metrics_handle = init_metrics();
        start_metrics_server(config.metrics_port, metrics_handle)
            .await
            .context("Failed to start metrics server")?;
        gauge!("ingest_running").set(1.0);
    }

    // Set up graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    ctrlc::set_handler(move || {
        tracing::info!("Shutdown signal received, stopping gracefully...");
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;

    let mut supervisor = Supervisor::new(config).context("Failed to build supervisor")?;

    tracing::info!("Starting live ingestion...");
    supervisor.run(&running).await;

    gauge!("ingest_running").set(0.0);

    // Print summary
    let counters = supervisor.counters();
    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("SHUTDOWN COMPLETE");
    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("Records seen:         {}", counters.seen);
    tracing::info!("Decode failures:      {}", counters.decode_failed);
    tracing::info!("Filtered out:         {}", counters.filtered_out);
    tracing::info!("Payloads built:       {}", counters.built);
    tracing::info!("Payloads rejected:    {}", counters.build_failed);
    tracing::info!("Delivered:            {}", counters.delivered);
    tracing::info!("Delivery failures:    {}", counters.delivery_failed);
    tracing::info!("Stored downstream:    {}", counters.stored);
    tracing::info!("Reconnects:           {}", counters.reconnects);

    Ok(())
}
