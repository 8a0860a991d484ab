//! Session statistics output.
//!
//! Summarizes the counters collected during one monitor session. Written to
//! the log at shutdown.

use crate::metrics::{
    RENDER_PASSES_TOTAL, SNAPSHOTS_RECEIVED_TOTAL, SNAPSHOT_PARSE_FAILURES_TOTAL,
    WS_RECONNECT_TOTAL,
};
use chrono::{DateTime, Utc};
use tracing::info;

/// Counters for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub snapshots_received: u64,
    pub parse_failures: u64,
    pub reconnects: u64,
    /// (view name, render passes)
    pub render_passes: Vec<(String, u64)>,
}

/// Session summary reporter.
pub struct SessionSummary {
    views: Vec<String>,
    start_time: DateTime<Utc>,
}

impl SessionSummary {
    /// Create a reporter for the given view names.
    pub fn new(views: Vec<String>) -> Self {
        Self {
            views,
            start_time: Utc::now(),
        }
    }

    /// Read current counter values.
    pub fn get_stats(&self) -> SessionStats {
        SessionStats {
            snapshots_received: SNAPSHOTS_RECEIVED_TOTAL.get(),
            parse_failures: SNAPSHOT_PARSE_FAILURES_TOTAL.get(),
            reconnects: WS_RECONNECT_TOTAL.get(),
            render_passes: self
                .views
                .iter()
                .map(|v| (v.clone(), RENDER_PASSES_TOTAL.with_label_values(&[v]).get()))
                .collect(),
        }
    }

    /// Output session statistics to logs.
    pub fn output_summary(&self) {
        let stats = self.get_stats();
        let duration = Utc::now() - self.start_time;

        info!("========== Session Summary ==========");
        info!(
            "Period: {} ({} hours {} minutes)",
            self.start_time.format("%Y-%m-%d %H:%M:%S UTC"),
            duration.num_hours(),
            duration.num_minutes() % 60
        );
        info!(
            snapshots = stats.snapshots_received,
            parse_failures = stats.parse_failures,
            reconnects = stats.reconnects,
            "Snapshot channel"
        );
        for (view, passes) in &stats.render_passes {
            info!(view = %view, passes, "Render passes");
        }
        info!("=====================================");
    }
}
