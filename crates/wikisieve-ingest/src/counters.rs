//! Process-lifetime pipeline counters.
//!
//! Owned by the supervisor and only ever touched from its single control
//! thread; no locking. The counters survive stream reconnects and are never
//! reset except at process start. Every recording method also mirrors into
//! the Prometheus counters registered by `wikisieve_core::metrics`.

use metrics::counter;

/// Running totals for every pipeline stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineCounters {
    /// Raw records seen, heartbeats included.
    pub seen: u64,
    /// Non-empty records that failed to decode.
    pub decode_failed: u64,
    /// Decoded events the filter rejected.
    pub filtered_out: u64,
    /// Candidates that produced a valid payload.
    pub built: u64,
    /// Candidates rejected by payload validation.
    pub build_failed: u64,
    /// Payloads accepted downstream.
    pub delivered: u64,
    /// Payloads rejected downstream or lost to transport failures.
    pub delivery_failed: u64,
    /// Deliveries reported as persisted by the downstream endpoint.
    pub stored: u64,
    /// Deliveries the downstream endpoint reported as not persisted.
    pub store_failed: u64,
    /// Reconnection attempts after a stream failure or stream end.
    pub reconnects: u64,
}

impl PipelineCounters {
    pub fn record_seen(&mut self) {
        self.seen += 1;
        counter!("stream_records_seen_total").increment(1);
    }

    pub fn record_decode_failed(&mut self) {
        self.decode_failed += 1;
        counter!("stream_decode_failures_total").increment(1);
    }

    pub fn record_filtered_out(&mut self) {
        self.filtered_out += 1;
        counter!("filter_rejected_total").increment(1);
    }

    pub fn record_built(&mut self) {
        self.built += 1;
        counter!("candidates_total").increment(1);
    }

    pub fn record_build_failed(&mut self) {
        self.build_failed += 1;
        counter!("payload_rejected_total").increment(1);
    }

    pub fn record_delivered(&mut self) {
        self.delivered += 1;
        counter!("deliveries_ok_total").increment(1);
    }

    pub fn record_delivery_failed(&mut self) {
        self.delivery_failed += 1;
        counter!("deliveries_failed_total").increment(1);
    }

    pub fn record_stored(&mut self) {
        self.stored += 1;
        counter!("deliveries_stored_total").increment(1);
    }

    pub fn record_store_failed(&mut self) {
        self.store_failed += 1;
        counter!("deliveries_not_stored_total").increment(1);
    }

    pub fn record_reconnect(&mut self) {
        self.reconnects += 1;
        counter!("stream_reconnects_total").increment(1);
    }

    /// Emit the periodic one-line summary.
    pub fn log_summary(&self) {
        tracing::info!(
            seen = self.seen,
            decode_failed = self.decode_failed,
            filtered_out = self.filtered_out,
            built = self.built,
            build_failed = self.build_failed,
            delivered = self.delivered,
            delivery_failed = self.delivery_failed,
            stored = self.stored,
            store_failed = self.store_failed,
            reconnects = self.reconnects,
            "pipeline counters"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_touches_only_its_own_counter() {
        let mut counters = PipelineCounters::default();

        counters.record_seen();
        counters.record_seen();
        counters.record_decode_failed();
        counters.record_filtered_out();
        counters.record_built();
        counters.record_delivered();
        counters.record_stored();

        assert_eq!(counters.seen, 2);
        assert_eq!(counters.decode_failed, 1);
        assert_eq!(counters.filtered_out, 1);
        assert_eq!(counters.built, 1);
        assert_eq!(counters.build_failed, 0);
        assert_eq!(counters.delivered, 1);
        assert_eq!(counters.delivery_failed, 0);
        assert_eq!(counters.stored, 1);
        assert_eq!(counters.store_failed, 0);
        assert_eq!(counters.reconnects, 0);
    }

    #[test]
    fn reconnects_do_not_disturb_stage_totals() {
        let mut counters = PipelineCounters::default();
        counters.record_seen();
        counters.record_delivered();

        let before = counters;
        counters.record_reconnect();

        assert_eq!(counters.seen, before.seen);
        assert_eq!(counters.delivered, before.delivered);
        assert_eq!(counters.reconnects, 1);
    }

    #[test]
    fn log_summary_does_not_panic_without_recorder() {
        PipelineCounters::default().log_summary();
    }
}
