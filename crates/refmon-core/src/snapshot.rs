//! Reflector snapshot types.
//!
//! A snapshot is a complete report of reflector state at one instant. It is
//! never patched: every push from the server replaces the previous snapshot
//! wholesale.

use crate::error::{CoreError, Result};
use crate::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};

/// Full-state snapshot pushed by the reflector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectorSnapshot {
    pub reflector_name: String,
    pub uptime_seconds: u64,
    pub total_clients: u64,
    pub total_streams: u64,
    #[serde(default)]
    pub total_packets: u64,
    #[serde(default)]
    pub total_bytes: u64,
    pub modules: Vec<ModuleStat>,
    pub clients: Vec<PeerStat>,
    pub active_streams: Vec<StreamInfo>,
    pub recent_streams: Vec<StreamInfo>,
}

impl ReflectorSnapshot {
    /// Decode a snapshot from a wire message.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(CoreError::Decode)
    }

    /// Encode a snapshot into a wire message.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(CoreError::Encode)
    }

    /// Peers attached to `module`, in server order.
    pub fn peers_in<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a PeerStat> + 'a {
        self.clients.iter().filter(move |p| p.module == module)
    }
}

/// Per-module aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleStat {
    pub module: String,
    pub clients: u64,
    pub active_streams: u64,
    #[serde(default)]
    pub total_packets: u64,
    #[serde(default)]
    pub total_bytes: u64,
}

impl ModuleStat {
    #[inline]
    pub fn has_active_streams(&self) -> bool {
        self.active_streams > 0
    }
}

/// A connected peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerStat {
    pub callsign: String,
    pub module: String,
    /// Cumulative packet counter (monotonic).
    pub packets_in: u64,
    /// Cumulative byte counter (monotonic).
    pub bytes_in: u64,
    #[serde(default)]
    pub connected_since: Option<Timestamp>,
    #[serde(default)]
    pub last_seen: Option<Timestamp>,
}

impl PeerStat {
    /// Callsign as used for correlation (surrounding whitespace removed).
    #[inline]
    pub fn key(&self) -> &str {
        self.callsign.trim()
    }
}

/// An active or recently ended stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub source: String,
    #[serde(default)]
    pub peer: Option<String>,
    pub destination: String,
    pub module: String,
    #[serde(default, deserialize_with = "deserialize_stream_id")]
    pub stream_id: Option<String>,
    #[serde(default)]
    pub frames: Option<u64>,
    #[serde(default)]
    pub started_at: Option<Timestamp>,
    #[serde(default)]
    pub ended_at: Option<Timestamp>,
}

impl StreamInfo {
    /// Trimmed peer callsign, `None` when absent or blank.
    pub fn peer_callsign(&self) -> Option<&str> {
        self.peer
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// The reflector sends stream ids as integers; accept strings as well.
fn deserialize_stream_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawStreamId {
        Number(u64),
        Text(String),
    }

    Ok(
        Option::<RawStreamId>::deserialize(deserializer)?.map(|raw| match raw {
            RawStreamId::Number(n) => n.to_string(),
            RawStreamId::Text(s) => s,
        }),
    )
}
