//! wikisieve ingestion pipeline.
//!
//! This crate consumes the public recent-changes event stream, keeps only
//! significant human-authored article edits, and forwards each one to the
//! downstream ingest endpoint exactly once per event.
//!
//! # Modules
//!
//! - [`sse`] - Incremental server-sent-event frame parsing
//! - [`deliver`] - Delivery client and outcome classification
//! - [`supervisor`] - Connection lifecycle and the per-record pipeline
//! - [`counters`] - Process-lifetime running totals
//! - [`config`] - Environment-driven configuration
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   Event Stream   │  (server-sent events, one record per edit)
//! └────────┬─────────┘
//!          │ decode
//!          ▼
//! ┌──────────────────┐
//! │    EditFilter    │  significant, human-authored article edits only
//! └────────┬─────────┘
//!          │ build (fresh correlation id)
//!          ▼
//! ┌──────────────────┐
//! │ CandidatePayload │  normalized delivery contract
//! └────────┬─────────┘
//!          │ deliver (single attempt, bounded timeout)
//!          ▼
//! ┌──────────────────┐
//! │  DeliveryClient  │  POST /ingest, outcome classified and counted
//! └──────────────────┘
//! ```
//!
//! Records are processed strictly in stream order, one at a time; the only
//! state carried across records is the supervisor's counters.

pub mod config;
pub mod counters;
pub mod deliver;
pub mod error;
pub mod sse;
pub mod supervisor;

pub use config::Config;
pub use counters::PipelineCounters;
pub use deliver::{DeliveryClient, DeliveryOutcome, StoredStatus};
pub use error::{Error, Result};
pub use sse::SseParser;
pub use supervisor::{FixedDelay, ReconnectPolicy, Supervisor};

/// Client identification sent on every upstream and downstream request.
pub(crate) const USER_AGENT: &str = concat!(
    "wikisieve-ingest/",
    env!("CARGO_PKG_VERSION"),
    " (contact: ops@wikisieve.dev)"
);
