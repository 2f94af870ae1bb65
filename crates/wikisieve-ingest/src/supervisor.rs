//! Stream supervisor: connection lifecycle and the per-record pipeline.
//!
//! The supervisor owns the only long-lived connection and drives every raw
//! record through decode → filter → build → deliver before reading the next
//! one, so candidates reach the downstream endpoint in stream order. On any
//! stream failure it logs, waits out the reconnect policy, and tries again
//! forever; the counters survive across connections.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header;
use uuid::Uuid;

use wikisieve_core::{ChangeEvent, EditFilter, build_payload};

use crate::config::Config;
use crate::counters::PipelineCounters;
use crate::deliver::{DeliveryClient, DeliveryOutcome, StoredStatus};
use crate::sse::SseParser;
use crate::{Result, USER_AGENT};

/// Maximum response-body length echoed into a log line.
const LOG_BODY_LIMIT: usize = 512;

/// Strategy for pacing reconnection attempts.
///
/// The shipped policy is a fixed delay; the seam exists so backoff growth
/// can be swapped in without touching the pipeline.
pub trait ReconnectPolicy: Send {
    /// Delay to wait before the next connection attempt.
    fn next_delay(&mut self) -> Duration;

    /// Called after a connection is successfully established.
    fn reset(&mut self);
}

/// Reconnect after the same fixed delay, every time.
#[derive(Debug, Clone)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl ReconnectPolicy for FixedDelay {
    fn next_delay(&mut self) -> Duration {
        self.delay
    }

    fn reset(&mut self) {}
}

/// Owns the stream connection and drives the ingestion pipeline.
pub struct Supervisor {
    config: Config,
    filter: EditFilter,
    delivery: DeliveryClient,
    stream_client: reqwest::Client,
    reconnect: Box<dyn ReconnectPolicy>,
    counters: PipelineCounters,
}

impl Supervisor {
    /// Build a supervisor from validated configuration.
    pub fn new(config: Config) -> Result<Self> {
        let filter = EditFilter::new(config.target_wiki.clone(), config.significance_threshold);
        let delivery = DeliveryClient::new(config.ingest_url.clone(), config.delivery_timeout)?;

        // The stream connection is long-lived, so only the connect phase is
        // bounded; reads block until the server sends data or a keepalive.
        let stream_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        let reconnect = Box::new(FixedDelay::new(config.reconnect_delay));

        Ok(Self {
            config,
            filter,
            delivery,
            stream_client,
            reconnect,
            counters: PipelineCounters::default(),
        })
    }

    /// Swap the reconnect pacing strategy.
    pub fn with_reconnect_policy(mut self, policy: Box<dyn ReconnectPolicy>) -> Self {
        self.reconnect = policy;
        self
    }

    /// The running totals, for shutdown summaries.
    pub fn counters(&self) -> &PipelineCounters {
        &self.counters
    }

    /// Run the connect/read/reconnect loop until `running` is cleared.
    pub async fn run(&mut self, running: &AtomicBool) {
        while running.load(Ordering::SeqCst) {
            let result = self.run_connection(running).await;
            if !running.load(Ordering::SeqCst) {
                break;
            }

            match result {
                Ok(()) => tracing::warn!("event stream ended; scheduling reconnect"),
                Err(e) => tracing::warn!(error = %e, "event stream failed; scheduling reconnect"),
            }

            self.counters.record_reconnect();
            let delay = self.reconnect.next_delay();
            tracing::info!(delay_secs = delay.as_secs(), "waiting before reconnect");
            tokio::time::sleep(delay).await;
        }

        tracing::info!("supervisor stopped");
    }

    /// One connection attempt: open the stream and process records until it
    /// ends, fails, or shutdown is requested.
    async fn run_connection(&mut self, running: &AtomicBool) -> Result<()> {
        let response = self
            .stream_client
            .get(&self.config.stream_url)
            .header(header::ACCEPT, "text/event-stream")
            .send()
            .await?
            .error_for_status()?;

        tracing::info!(url = %self.config.stream_url, "connected to event stream");
        self.reconnect.reset();

        let mut chunks = response.bytes_stream();
        let mut parser = SseParser::new();

        while let Some(chunk) = chunks.next().await {
            if !running.load(Ordering::SeqCst) {
                return Ok(());
            }

            let chunk = chunk?;
            for record in parser.feed(&chunk) {
                self.process_record(&record).await;
            }
        }

        // Server closed the stream without a transport error.
        Ok(())
    }

    /// Drive one raw record through the whole pipeline.
    async fn process_record(&mut self, record: &str) {
        self.counters.record_seen();
        if self.counters.seen.is_multiple_of(self.config.summary_interval) {
            self.counters.log_summary();
        }

        // Heartbeat, not an event.
        if record.trim().is_empty() {
            return;
        }

        let event = match ChangeEvent::parse(record) {
            Ok(event) => event,
            Err(e) => {
                self.counters.record_decode_failed();
                tracing::debug!(error = %e, "discarding undecodable record");
                return;
            }
        };

        if !self.filter.is_candidate(&event) {
            self.counters.record_filtered_out();
            return;
        }

        // Fresh correlation id per candidate, generated before validation so
        // rejections are traceable under the same identifier.
        let request_id = Uuid::new_v4();

        let payload = match build_payload(&event, request_id) {
            Some(payload) => payload,
            None => {
                self.counters.record_build_failed();
                tracing::warn!(
                    request_id = %request_id,
                    title = event.title.as_deref().unwrap_or(""),
                    "candidate failed payload validation"
                );
                return;
            }
        };
        self.counters.record_built();

        match self.delivery.deliver(&payload).await {
            DeliveryOutcome::Delivered { stored } => {
                self.counters.record_delivered();
                match stored {
                    StoredStatus::Stored => self.counters.record_stored(),
                    StoredStatus::NotStored => self.counters.record_store_failed(),
                    StoredStatus::Unknown => {}
                }
                tracing::info!(
                    request_id = %request_id,
                    title = %payload.title,
                    change_size = payload.change_size,
                    at = %format_timestamp(payload.timestamp),
                    stored = ?stored,
                    "candidate delivered"
                );
            }
            DeliveryOutcome::Rejected { status, body } => {
                self.counters.record_delivery_failed();
                tracing::warn!(
                    request_id = %request_id,
                    status = %status,
                    body = %truncate_for_log(&body),
                    "delivery rejected by downstream endpoint"
                );
            }
            DeliveryOutcome::TransportFailed(e) => {
                self.counters.record_delivery_failed();
                tracing::warn!(
                    request_id = %request_id,
                    error = %e,
                    "delivery failed in transport"
                );
            }
        }
    }
}

/// Human-readable form of an event timestamp for log lines.
fn format_timestamp(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| "invalid".to_string())
}

fn truncate_for_log(body: &str) -> &str {
    match body.char_indices().nth(LOG_BODY_LIMIT) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
