//! Delivery client for the downstream ingest endpoint.
//!
//! One delivery attempt per candidate, bounded by a timeout; classification
//! of the response is the caller's signal for counting and logging. Retry
//! policy does not live here: the supervisor only retries the stream
//! connection as a whole, never individual payloads.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use wikisieve_core::CandidatePayload;

use crate::{Result, USER_AGENT};

/// Whether the downstream endpoint reported persisting the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredStatus {
    Stored,
    NotStored,
    /// Response body absent, unparseable, or silent on the subject.
    Unknown,
}

/// Classification of one delivery attempt.
#[derive(Debug)]
pub enum DeliveryOutcome {
    /// The endpoint accepted the payload (2xx).
    Delivered { stored: StoredStatus },
    /// The endpoint answered with a non-success status.
    Rejected { status: StatusCode, body: String },
    /// The request never completed (timeout, refused connection, DNS, ...).
    TransportFailed(reqwest::Error),
}

/// HTTP client for `POST`ing candidate payloads downstream.
pub struct DeliveryClient {
    http: reqwest::Client,
    ingest_url: String,
}

impl DeliveryClient {
    /// Build a client for the given endpoint with the given per-request
    /// timeout.
    pub fn new(ingest_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            ingest_url: ingest_url.into(),
        })
    }

    /// Deliver one payload. A single attempt; never retries.
    pub async fn deliver(&self, payload: &CandidatePayload) -> DeliveryOutcome {
        let response = match self
            .http
            .post(&self.ingest_url)
            .json(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return DeliveryOutcome::TransportFailed(e),
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            DeliveryOutcome::Delivered {
                stored: classify_stored(&body),
            }
        } else {
            DeliveryOutcome::Rejected { status, body }
        }
    }
}

/// Read the optional storage-result flag out of a success response body.
fn classify_stored(body: &str) -> StoredStatus {
    #[derive(Deserialize)]
    struct IngestResponse {
        #[serde(default)]
        db_inserted: Option<bool>,
    }

    match serde_json::from_str::<IngestResponse>(body) {
        Ok(IngestResponse {
            db_inserted: Some(true),
        }) => StoredStatus::Stored,
        Ok(IngestResponse {
            db_inserted: Some(false),
        }) => StoredStatus::NotStored,
        _ => StoredStatus::Unknown,
    }
}
