//! Snapshot channel for reflector dashboards.
//!
//! Provides a receive-only WebSocket client with:
//! - Fixed-delay automatic reconnection (no backoff, no retry cap)
//! - Explicit Connecting / Open / Reconnecting state machine
//! - Snapshot decoding with malformed payloads dropped, connection kept

pub mod connection;
pub mod error;

pub use connection::{
    decode_snapshot, endpoint_url, ChannelConfig, ChannelState, ChannelStats, SnapshotChannel,
    DEFAULT_RECONNECT_DELAY_MS, ENDPOINT_PATH,
};
pub use error::{WsError, WsResult};
