//! Shared test fixtures.

pub mod mock_ws;

use refmon::AppConfig;
use refmon_dashboard::{DashboardConfig, ViewKind};
use serde_json::json;

/// Config pointing at `url` with a short reconnect delay and no screen clearing.
pub fn test_config(url: String, reconnect_delay_ms: u64) -> AppConfig {
    let mut config = AppConfig {
        url: Some(url),
        dashboard: DashboardConfig {
            views: vec![ViewKind::Summary, ViewKind::Modules],
            clear_screen: false,
            ..Default::default()
        },
        ..Default::default()
    };
    config.websocket.reconnect_delay_ms = reconnect_delay_ms;
    config
}

/// Wire snapshot with one module `A` and one peer `N0CALL` at `packets`.
pub fn snapshot_json(name: &str, packets: u64) -> String {
    json!({
        "reflector_name": name,
        "uptime_seconds": 3661,
        "total_clients": 1,
        "total_streams": 0,
        "total_packets": packets,
        "total_bytes": packets * 54,
        "modules": [
            {"module": "A", "clients": 1, "active_streams": 0}
        ],
        "clients": [
            {"callsign": "N0CALL", "module": "A",
             "connected_since": {"secs_since_epoch": 1700000000, "nanos_since_epoch": 0},
             "last_seen": {"secs_since_epoch": 1700000000, "nanos_since_epoch": 0},
             "packets_in": packets, "bytes_in": packets * 54}
        ],
        "active_streams": [],
        "recent_streams": []
    })
    .to_string()
}
