//! Prometheus metrics for refmon.
//!
//! Covers:
//! - Snapshot channel connection state
//! - Reconnection attempts
//! - Snapshots received and malformed payloads dropped
//! - Render passes per view
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. Registration only fails
//! on duplicate metric names, which is a programming error caught on first
//! access.

use once_cell::sync::Lazy;
use prometheus::{
    register_gauge, register_gauge_vec, register_int_counter, register_int_counter_vec, Gauge,
    GaugeVec, IntCounter, IntCounterVec,
};

/// Channel states reported through `WS_STATE`.
pub const CHANNEL_STATES: [&str; 4] = ["disconnected", "connecting", "open", "reconnecting"];

/// WebSocket connection state (1 = open, 0 = otherwise).
pub static WS_CONNECTED: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!("refmon_ws_connected", "Snapshot channel open (1=open)").unwrap()
});

/// Snapshot channel state machine current state.
/// Labels: state (disconnected/connecting/open/reconnecting)
pub static WS_STATE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "refmon_ws_state",
        "Snapshot channel state machine current state (1=active, 0=inactive)",
        &["state"]
    )
    .unwrap()
});

/// Total reconnection attempts.
pub static WS_RECONNECT_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "refmon_ws_reconnect_total",
        "Total snapshot channel reconnection attempts"
    )
    .unwrap()
});

/// Total snapshots decoded and published.
pub static SNAPSHOTS_RECEIVED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "refmon_snapshots_received_total",
        "Total snapshots decoded and published"
    )
    .unwrap()
});

/// Total inbound payloads dropped because they failed to decode.
pub static SNAPSHOT_PARSE_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "refmon_snapshot_parse_failures_total",
        "Total inbound payloads dropped as malformed"
    )
    .unwrap()
});

/// Render passes per view.
pub static RENDER_PASSES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "refmon_render_passes_total",
        "Total render passes per dashboard view",
        &["view"]
    )
    .unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    /// Set the channel state. Only the active state is 1, all others 0.
    pub fn ws_state_set(state: &str) {
        for s in &CHANNEL_STATES {
            WS_STATE.with_label_values(&[s]).set(0.0);
        }
        WS_STATE.with_label_values(&[state]).set(1.0);
        WS_CONNECTED.set(if state == "open" { 1.0 } else { 0.0 });
    }

    /// Record a reconnection attempt.
    pub fn ws_reconnect() {
        WS_RECONNECT_TOTAL.inc();
    }

    /// Record a published snapshot.
    pub fn snapshot_received() {
        SNAPSHOTS_RECEIVED_TOTAL.inc();
    }

    /// Record a dropped malformed payload.
    pub fn snapshot_parse_failed() {
        SNAPSHOT_PARSE_FAILURES_TOTAL.inc();
    }

    /// Record a render pass for `view`.
    pub fn render_pass(view: &str) {
        RENDER_PASSES_TOTAL.with_label_values(&[view]).inc();
    }
}
