//! refmon-dashboard - Snapshot distribution, activity inference and views.
//!
//! This crate turns the stream of full-state snapshots received by
//! `refmon-ws` into rendered dashboard views. It includes:
//!
//! - `UpdateBus`: fan-out of each snapshot to registered subscribers
//! - `ActivityTracker`: packet edge detection, stream correlation, cold start
//! - `SummaryView` / `ModulesView`: pure snapshot-to-table renderers
//! - `RenderSurface`: where rendered views end up (terminal, JSON, memory)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       refmon process                          │
//! │                                                              │
//! │  SnapshotChannel (refmon-ws)                                 │
//! │          │ publish(ReflectorSnapshot)                        │
//! │          ▼                                                   │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                UpdateBus (registration order)          │  │
//! │  └──────┬──────────────────┬──────────────────┬───────────┘  │
//! │         ▼                  ▼                  ▼              │
//! │  TrackerSubscriber   ViewRenderer<S>    ViewRenderer<S>      │
//! │  (ActivityTracker)   (SummaryView)      (ModulesView)        │
//! │         │                  │                  │              │
//! │         └── frame() ───────┴──────────────────┤              │
//! │                                               ▼              │
//! │                                    RenderSurface (stdout)    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tracker subscriber must be registered before any renderer so that
//! every render pass sees the frame computed from the same snapshot.
//!
//! # Usage
//!
//! ```ignore
//! use refmon_dashboard::{ActivityTracker, TrackerSubscriber, UpdateBus, ViewRenderer};
//!
//! let bus = Arc::new(UpdateBus::new());
//! let tracker = ActivityTracker::shared();
//! bus.subscribe(TrackerSubscriber::new(tracker.clone()));
//!
//! let surface = Arc::new(Mutex::new(TextSurface::stdout(true)));
//! for kind in &config.views {
//!     bus.subscribe(ViewRenderer::new(kind.build(), tracker.clone(), surface.clone()));
//! }
//!
//! let channel = SnapshotChannel::new(ws_config, bus.clone());
//! ```

pub mod activity;
pub mod bus;
pub mod config;
pub mod error;
pub mod format;
pub mod surface;
pub mod types;
pub mod views;

pub use activity::{ActivityFrame, ActivityTracker, PeerActivity, SharedTracker, TrackerSubscriber};
pub use bus::{SnapshotSubscriber, UpdateBus};
pub use config::{DashboardConfig, OutputFormat, ViewKind};
pub use error::{DashboardError, DashboardResult};
pub use format::{format_bytes, format_duration, format_elapsed, format_time};
pub use surface::{JsonSurface, RecordingSurface, RenderSurface, TextSurface};
pub use types::{Cell, RenderedView, Section, StatusTag, Table, TableBody, PLACEHOLDER_TEXT};
pub use views::{ModulesView, SummaryView, View, ViewRenderer};

#[cfg(test)]
pub(crate) mod test_support {
    use refmon_core::{ModuleStat, PeerStat, ReflectorSnapshot, StreamInfo, Timestamp};

    pub const CONNECTED_SINCE: i64 = 1_700_000_000;

    pub fn snapshot(name: &str) -> ReflectorSnapshot {
        ReflectorSnapshot {
            reflector_name: name.to_string(),
            uptime_seconds: 0,
            total_clients: 0,
            total_streams: 0,
            total_packets: 0,
            total_bytes: 0,
            modules: vec![],
            clients: vec![],
            active_streams: vec![],
            recent_streams: vec![],
        }
    }

    pub fn snapshot_with(peers: Vec<PeerStat>, streams: Vec<StreamInfo>) -> ReflectorSnapshot {
        ReflectorSnapshot {
            total_clients: peers.len() as u64,
            clients: peers,
            active_streams: streams,
            ..snapshot("Test")
        }
    }

    pub fn module(name: &str, clients: u64, active_streams: u64) -> ModuleStat {
        ModuleStat {
            module: name.to_string(),
            clients,
            active_streams,
            total_packets: 0,
            total_bytes: 0,
        }
    }

    pub fn peer(callsign: &str, module: &str, packets: u64) -> PeerStat {
        PeerStat {
            callsign: callsign.to_string(),
            module: module.to_string(),
            packets_in: packets,
            bytes_in: packets * 54,
            connected_since: Some(Timestamp::from_secs(CONNECTED_SINCE)),
            last_seen: Some(Timestamp::from_secs(CONNECTED_SINCE)),
        }
    }

    pub fn active_stream(source: &str, peer: Option<&str>, module: &str) -> StreamInfo {
        StreamInfo {
            source: source.to_string(),
            peer: peer.map(str::to_string),
            destination: "ALL".to_string(),
            module: module.to_string(),
            stream_id: Some("51966".to_string()),
            frames: Some(25),
            started_at: Some(Timestamp::from_secs(CONNECTED_SINCE)),
            ended_at: None,
        }
    }

    pub fn recent_stream(source: &str, ended_at: Option<i64>) -> StreamInfo {
        StreamInfo {
            ended_at: ended_at.map(Timestamp::from_secs),
            ..active_stream(source, Some(source), "A")
        }
    }
}
