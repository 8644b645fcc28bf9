//! Prometheus metrics for video-service
//!
//! Tracks webhook correlation and live-comment fan-out:
//! - clipstream_webhook_events_total (counter, labels: event_type, outcome)
//! - clipstream_webhook_correlation_failures_total (counter, labels: event_type)
//! - clipstream_live_comment_broadcasts_total (counter, labels: event)

use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// Lifecycle events received from the external platform
    /// Labels: event_type (wire vocabulary), outcome (processed|ignored|duplicate|failed)
    pub static ref WEBHOOK_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "clipstream_webhook_events_total",
        "Total number of lifecycle webhook events received",
        &["event_type", "outcome"]
    )
    .unwrap();

    /// Events that referenced an entity this service has no record of,
    /// e.g. an asset-ready arriving before its asset-created landed
    pub static ref WEBHOOK_CORRELATION_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "clipstream_webhook_correlation_failures_total",
        "Lifecycle events that could not be correlated with a known entity",
        &["event_type"]
    )
    .unwrap();

    /// Live comment events pushed to per-video rooms
    /// Labels: event (new-comment|comment-deleted)
    pub static ref LIVE_COMMENT_BROADCASTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "clipstream_live_comment_broadcasts_total",
        "Total number of live comment events broadcast to viewers",
        &["event"]
    )
    .unwrap();
}

/// Render all registered metrics in the Prometheus text format
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
