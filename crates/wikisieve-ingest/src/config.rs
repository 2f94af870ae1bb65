//! Daemon configuration loaded from environment variables.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::{Error, Result};

/// Default upstream recent-changes stream.
const DEFAULT_STREAM_URL: &str = "https://stream.wikimedia.org/v2/stream/recentchange";

/// Default downstream ingest endpoint.
const DEFAULT_INGEST_URL: &str = "http://localhost:8787/ingest";

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream server-sent-event stream URL.
    pub stream_url: String,

    /// Downstream ingest endpoint URL.
    pub ingest_url: String,

    /// Wiki identifier candidates must come from (e.g. "enwiki").
    pub target_wiki: String,

    /// Minimum absolute character delta for an edit to be significant.
    pub significance_threshold: i64,

    /// Emit a counter summary every this many records seen.
    pub summary_interval: u64,

    /// Fixed delay between stream reconnection attempts.
    pub reconnect_delay: Duration,

    /// Timeout for each delivery HTTP call.
    pub delivery_timeout: Duration,

    /// Prometheus metrics port (0 disables the metrics server).
    pub metrics_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional and fall back to defaults suitable for
    /// local development. An unparsable value is a startup error; the
    /// daemon must never run with a half-applied configuration.
    ///
    /// - `WIKISIEVE_STREAM_URL`: upstream SSE stream URL
    /// - `WIKISIEVE_INGEST_URL`: downstream endpoint (default `http://localhost:8787/ingest`)
    /// - `WIKISIEVE_TARGET_WIKI`: source wiki identifier (default `enwiki`)
    /// - `WIKISIEVE_THRESHOLD`: significance threshold in characters (default 1000)
    /// - `WIKISIEVE_SUMMARY_INTERVAL`: records between counter summaries (default 100, must be positive)
    /// - `WIKISIEVE_RECONNECT_DELAY_SECS`: fixed reconnect delay (default 5)
    /// - `WIKISIEVE_DELIVERY_TIMEOUT_SECS`: delivery HTTP timeout (default 5)
    /// - `WIKISIEVE_METRICS_PORT`: Prometheus port, 0 to disable (default 9090)
    pub fn from_env() -> Result<Self> {
        let stream_url = env_or("WIKISIEVE_STREAM_URL", DEFAULT_STREAM_URL);
        let ingest_url = env_or("WIKISIEVE_INGEST_URL", DEFAULT_INGEST_URL);
        let target_wiki = env_or("WIKISIEVE_TARGET_WIKI", "enwiki");

        let significance_threshold: i64 = env_parse("WIKISIEVE_THRESHOLD", 1000)?;
        if significance_threshold < 0 {
            return Err(Error::Config(format!(
                "WIKISIEVE_THRESHOLD must not be negative, got {significance_threshold}"
            )));
        }

        let summary_interval: u64 = env_parse("WIKISIEVE_SUMMARY_INTERVAL", 100)?;
        if summary_interval == 0 {
            return Err(Error::Config(
                "WIKISIEVE_SUMMARY_INTERVAL must be positive".to_string(),
            ));
        }

        let reconnect_delay = Duration::from_secs(env_parse("WIKISIEVE_RECONNECT_DELAY_SECS", 5)?);
        let delivery_timeout =
            Duration::from_secs(env_parse("WIKISIEVE_DELIVERY_TIMEOUT_SECS", 5)?);
        let metrics_port: u16 = env_parse("WIKISIEVE_METRICS_PORT", 9090)?;

        tracing::info!(
            stream_url = %stream_url,
            ingest_url = %ingest_url,
            target_wiki = %target_wiki,
            significance_threshold,
            summary_interval,
            reconnect_delay_secs = reconnect_delay.as_secs(),
            "ingestion configuration loaded"
        );

        Ok(Self {
            stream_url,
            ingest_url,
            target_wiki,
            significance_threshold,
            summary_interval,
            reconnect_delay,
            delivery_timeout,
            metrics_port,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("invalid {key}={raw}: {e}"))),
        Err(_) => Ok(default),
    }
}
