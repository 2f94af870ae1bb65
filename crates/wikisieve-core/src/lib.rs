//! Core types and pure pipeline stages for the wikisieve ingestion system.
//!
//! This crate provides:
//! - The decoded [`ChangeEvent`] model and JSON decoding for raw stream records
//! - The [`EditFilter`] candidate predicate (significant, human-authored edits)
//! - The [`CandidatePayload`] delivery contract and its builder
//! - Prometheus metrics helpers shared by the daemon binaries
//! - Shared error types
//!
//! Everything here is free of network I/O; the stream and delivery plumbing
//! lives in `wikisieve-ingest`.

mod error;
mod event;
mod filter;
mod payload;

pub mod metrics;

pub use error::{Error, Result};
pub use event::{ChangeEvent, EventKind, EventMeta, LengthPair};
pub use filter::{DEFAULT_EXCLUDED_PREFIXES, EditFilter, MAIN_NAMESPACE};
pub use payload::{CandidatePayload, build_payload};
