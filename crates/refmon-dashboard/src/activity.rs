//! Derived peer activity.
//!
//! The reflector reports cumulative counters and timestamps, never an
//! "active" flag. `ActivityTracker` turns consecutive snapshots into
//! activity signals:
//!
//! - Packet activity: edge detection on each peer's `packets_in` counter.
//!   A peer is active only for the interval in which its counter grew.
//! - Stream activity: a peer carried by an active stream with a non-blank
//!   source, shown with that source.
//! - Cold start: the frame built from the very first snapshot is marked
//!   `loading`, since nothing is known yet about growth.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use refmon_core::ReflectorSnapshot;
use tracing::debug;

use crate::bus::SnapshotSubscriber;

/// Tracker shared between the bus subscriber that updates it and the views
/// that read it.
pub type SharedTracker = Arc<RwLock<ActivityTracker>>;

/// Derived activity for one peer, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerActivity<'a> {
    /// No snapshot fully processed yet.
    Loading,
    /// Carried by an active stream from `source`.
    Streaming { source: &'a str },
    /// Packet counter grew since the previous snapshot.
    Packets,
    /// Connected, no observed traffic.
    Quiet,
}

/// Activity signals computed from one snapshot. Immutable once built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActivityFrame {
    /// True until the first snapshot has been fully processed.
    pub loading: bool,
    packet_active: HashSet<String>,
    /// Trimmed peer callsign -> trimmed stream source.
    stream_sources: HashMap<String, String>,
}

impl ActivityFrame {
    /// Frame before any snapshot has arrived.
    pub fn cold() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    /// Packet counter grew for `callsign` between the last two observations.
    pub fn is_packet_active(&self, callsign: &str) -> bool {
        self.packet_active.contains(callsign.trim())
    }

    /// Source of the active stream carrying `callsign`, if any.
    pub fn stream_source(&self, callsign: &str) -> Option<&str> {
        self.stream_sources.get(callsign.trim()).map(String::as_str)
    }

    pub fn peer_activity(&self, callsign: &str) -> PeerActivity<'_> {
        if self.loading {
            PeerActivity::Loading
        } else if let Some(source) = self.stream_source(callsign) {
            PeerActivity::Streaming { source }
        } else if self.is_packet_active(callsign) {
            PeerActivity::Packets
        } else {
            PeerActivity::Quiet
        }
    }

    pub fn packet_active_count(&self) -> usize {
        self.packet_active.len()
    }

    pub fn streaming_count(&self) -> usize {
        self.stream_sources.len()
    }
}

/// Stateful activity inference across snapshots.
#[derive(Debug)]
pub struct ActivityTracker {
    /// Trimmed callsign -> last observed `packets_in`. Keyed by callsign
    /// alone: a peer that moves modules keeps its history.
    last_packets: HashMap<String, u64>,
    warmed_up: bool,
    frame: Arc<ActivityFrame>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self {
            last_packets: HashMap::new(),
            warmed_up: false,
            frame: Arc::new(ActivityFrame::cold()),
        }
    }

    /// Create a tracker ready to be shared with views.
    pub fn shared() -> SharedTracker {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Fold `snapshot` into the tracker and return the resulting frame.
    pub fn observe(&mut self, snapshot: &ReflectorSnapshot) -> Arc<ActivityFrame> {
        let mut packet_active = HashSet::new();
        for peer in &snapshot.clients {
            let key = peer.key();
            let previous = self.last_packets.insert(key.to_string(), peer.packets_in);
            if previous.is_some_and(|last| peer.packets_in > last) {
                packet_active.insert(key.to_string());
            }
        }

        let stream_sources: HashMap<String, String> = snapshot
            .active_streams
            .iter()
            .filter_map(|s| {
                let source = s.source.trim();
                if source.is_empty() {
                    return None;
                }
                s.peer_callsign()
                    .map(|peer| (peer.to_string(), source.to_string()))
            })
            .collect();

        let frame = Arc::new(ActivityFrame {
            loading: !self.warmed_up,
            packet_active,
            stream_sources,
        });

        debug!(
            loading = frame.loading,
            packet_active = frame.packet_active_count(),
            streaming = frame.streaming_count(),
            tracked = self.last_packets.len(),
            "Activity frame computed"
        );

        self.warmed_up = true;
        self.frame = frame.clone();
        frame
    }

    /// Frame computed from the latest snapshot (cold before the first).
    pub fn frame(&self) -> Arc<ActivityFrame> {
        self.frame.clone()
    }

    /// At least one snapshot has been fully processed. Never reverts.
    pub fn is_warmed_up(&self) -> bool {
        self.warmed_up
    }

    pub fn last_packets(&self, callsign: &str) -> Option<u64> {
        self.last_packets.get(callsign.trim()).copied()
    }

    pub fn tracked_peers(&self) -> usize {
        self.last_packets.len()
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Bus subscriber that feeds a shared tracker. Must be registered before any
/// view that reads the tracker.
pub struct TrackerSubscriber {
    tracker: SharedTracker,
}

impl TrackerSubscriber {
    pub fn new(tracker: SharedTracker) -> Self {
        Self { tracker }
    }
}

impl SnapshotSubscriber for TrackerSubscriber {
    fn on_snapshot(&mut self, snapshot: &Arc<ReflectorSnapshot>) {
        self.tracker.write().observe(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{active_stream, peer, snapshot_with};

    fn packets_sequence(seq: &[u64]) -> Vec<bool> {
        let mut tracker = ActivityTracker::new();
        seq.iter()
            .map(|&n| {
                let snap = snapshot_with(vec![peer("N0CALL", "A", n)], vec![]);
                tracker.observe(&snap).is_packet_active("N0CALL")
            })
            .collect()
    }

    #[test]
    fn test_edge_detection() {
        assert_eq!(packets_sequence(&[10, 10, 25, 25]), vec![false, false, true, false]);
    }

    #[test]
    fn test_first_observation_never_active() {
        assert_eq!(packets_sequence(&[500]), vec![false]);
    }

    #[test]
    fn test_counter_reset_not_active() {
        // A reflector restart resets counters; a drop is not growth.
        assert_eq!(packets_sequence(&[40, 3, 4]), vec![false, false, true]);
    }

    #[test]
    fn test_cold_start_flag_flips_once() {
        let mut tracker = ActivityTracker::new();
        assert!(tracker.frame().loading);
        assert!(!tracker.is_warmed_up());

        let snap = snapshot_with(vec![peer("N0CALL", "A", 1)], vec![]);
        assert!(tracker.observe(&snap).loading);
        assert!(tracker.is_warmed_up());

        for _ in 0..3 {
            assert!(!tracker.observe(&snap).loading);
        }
        assert!(!tracker.frame().loading);
    }

    #[test]
    fn test_stream_correlation_trims_callsigns() {
        let mut tracker = ActivityTracker::new();
        let snap = snapshot_with(
            vec![peer(" N0CALL ", "A", 1)],
            vec![active_stream(" W1AW ", Some("N0CALL  "), "A")],
        );
        let frame = tracker.observe(&snap);
        assert_eq!(frame.stream_source("N0CALL"), Some("W1AW"));
        assert_eq!(frame.stream_source(" N0CALL "), Some("W1AW"));
    }

    #[test]
    fn test_stream_without_peer_ignored() {
        let mut tracker = ActivityTracker::new();
        let snap = snapshot_with(vec![], vec![active_stream("W1AW", None, "A")]);
        assert_eq!(tracker.observe(&snap).streaming_count(), 0);
    }

    #[test]
    fn test_stream_with_blank_source_ignored() {
        let mut tracker = ActivityTracker::new();
        tracker.observe(&snapshot_with(vec![peer("N0CALL", "A", 10)], vec![]));

        let frame = tracker.observe(&snapshot_with(
            vec![peer("N0CALL", "A", 11)],
            vec![active_stream("  ", Some("N0CALL"), "A")],
        ));
        assert_eq!(frame.stream_source("N0CALL"), None);
        assert_eq!(frame.peer_activity("N0CALL"), PeerActivity::Packets);
    }

    #[test]
    fn test_precedence_stream_over_packets() {
        let mut tracker = ActivityTracker::new();
        tracker.observe(&snapshot_with(vec![peer("N0CALL", "A", 10)], vec![]));

        let frame = tracker.observe(&snapshot_with(
            vec![peer("N0CALL", "A", 20)],
            vec![active_stream("W1AW", Some("N0CALL"), "A")],
        ));

        assert!(frame.is_packet_active("N0CALL"));
        assert_eq!(
            frame.peer_activity("N0CALL"),
            PeerActivity::Streaming { source: "W1AW" }
        );
    }

    #[test]
    fn test_loading_beats_everything() {
        let mut tracker = ActivityTracker::new();
        let frame = tracker.observe(&snapshot_with(
            vec![peer("N0CALL", "A", 10)],
            vec![active_stream("W1AW", Some("N0CALL"), "A")],
        ));
        assert_eq!(frame.peer_activity("N0CALL"), PeerActivity::Loading);
    }

    #[test]
    fn test_peer_moving_modules_keeps_history() {
        let mut tracker = ActivityTracker::new();
        tracker.observe(&snapshot_with(vec![peer("N0CALL", "A", 10)], vec![]));

        let frame = tracker.observe(&snapshot_with(vec![peer("N0CALL", "B", 11)], vec![]));
        assert!(frame.is_packet_active("N0CALL"));
        assert_eq!(tracker.last_packets("N0CALL"), Some(11));
        assert_eq!(tracker.tracked_peers(), 1);
    }

    #[test]
    fn test_departed_peer_history_retained() {
        let mut tracker = ActivityTracker::new();
        tracker.observe(&snapshot_with(vec![peer("N0CALL", "A", 10)], vec![]));
        tracker.observe(&snapshot_with(vec![], vec![]));

        let frame = tracker.observe(&snapshot_with(vec![peer("N0CALL", "A", 12)], vec![]));
        assert!(frame.is_packet_active("N0CALL"));
    }

    #[test]
    fn test_subscriber_updates_shared_tracker() {
        let tracker = ActivityTracker::shared();
        let mut subscriber = TrackerSubscriber::new(tracker.clone());

        let snap = Arc::new(snapshot_with(vec![peer("N0CALL", "A", 10)], vec![]));
        subscriber.on_snapshot(&snap);

        assert!(tracker.read().is_warmed_up());
        assert_eq!(tracker.read().last_packets("N0CALL"), Some(10));
    }
}
