//! Snapshot channel.
//!
//! Owns the WebSocket connection lifecycle: connect, decode each inbound
//! frame into a `ReflectorSnapshot`, hand it to the sink, and reconnect
//! after a fixed delay whenever the connection is lost.

use crate::error::{WsError, WsResult};
use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use refmon_core::{ReflectorSnapshot, SnapshotSink};
use refmon_telemetry::Metrics;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::{connect_async_tls_with_config, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Path of the snapshot endpoint on the reflector's host.
pub const ENDPOINT_PATH: &str = "/ws";

/// Delay between a lost connection and the next attempt.
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 1000;

/// Build the snapshot endpoint URL for a host.
///
/// `host` may carry a port (`reflector.example.org:8443`).
pub fn endpoint_url(host: &str, secure: bool) -> String {
    let scheme = if secure { "wss" } else { "ws" };
    let host = host.trim().trim_end_matches('/');
    format!("{scheme}://{host}{ENDPOINT_PATH}")
}

/// Channel configuration.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// WebSocket URL.
    pub url: String,
    /// Fixed reconnect delay. Retries are unbounded.
    pub reconnect_delay_ms: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            reconnect_delay_ms: DEFAULT_RECONNECT_DELAY_MS,
        }
    }
}

impl ChannelConfig {
    /// Configuration for the well-known endpoint on `host`.
    pub fn for_host(host: &str, secure: bool) -> Self {
        Self {
            url: endpoint_url(host, secure),
            ..Default::default()
        }
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// Reject URLs that can never connect, so they fail once at startup
    /// instead of looping through reconnects.
    pub fn validate(&self) -> WsResult<()> {
        if self.url.starts_with("ws://") || self.url.starts_with("wss://") {
            Ok(())
        } else {
            Err(WsError::InvalidEndpoint(self.url.clone()))
        }
    }
}

/// Channel state.
///
/// Any failure while `Connecting` or `Open` moves to `Reconnecting`, which
/// schedules exactly one retry and then returns to `Connecting`.
/// `Disconnected` is reached only before the first attempt and on shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Open,
    Reconnecting,
}

impl ChannelState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Reconnecting => "reconnecting",
        }
    }
}

/// Channel counters.
#[derive(Debug, Default)]
pub struct ChannelStats {
    snapshots_received: AtomicU64,
    parse_failures: AtomicU64,
    connect_attempts: AtomicU64,
    reconnects: AtomicU64,
    last_snapshot_at: RwLock<Option<DateTime<Utc>>>,
}

impl ChannelStats {
    fn record_snapshot(&self) {
        self.snapshots_received.fetch_add(1, Ordering::Relaxed);
        *self.last_snapshot_at.write() = Some(Utc::now());
        Metrics::snapshot_received();
    }

    fn record_parse_failure(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
        Metrics::snapshot_parse_failed();
    }

    fn record_attempt(&self) {
        self.connect_attempts.fetch_add(1, Ordering::Relaxed);
    }

    fn record_reconnect(&self) {
        self.reconnects.fetch_add(1, Ordering::Relaxed);
        Metrics::ws_reconnect();
    }

    pub fn snapshots_received(&self) -> u64 {
        self.snapshots_received.load(Ordering::Relaxed)
    }

    pub fn parse_failures(&self) -> u64 {
        self.parse_failures.load(Ordering::Relaxed)
    }

    pub fn connect_attempts(&self) -> u64 {
        self.connect_attempts.load(Ordering::Relaxed)
    }

    pub fn reconnects(&self) -> u64 {
        self.reconnects.load(Ordering::Relaxed)
    }

    /// Arrival time of the most recent valid snapshot.
    pub fn last_snapshot_at(&self) -> Option<DateTime<Utc>> {
        *self.last_snapshot_at.read()
    }
}

/// Receive-only snapshot channel.
pub struct SnapshotChannel {
    config: ChannelConfig,
    state: Arc<RwLock<ChannelState>>,
    sink: Arc<dyn SnapshotSink>,
    stats: Arc<ChannelStats>,
    /// Cancelled on process shutdown.
    shutdown_token: CancellationToken,
}

impl SnapshotChannel {
    /// Create a channel that publishes every decoded snapshot to `sink`.
    pub fn new(config: ChannelConfig, sink: Arc<dyn SnapshotSink>) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(ChannelState::Disconnected)),
            sink,
            stats: Arc::new(ChannelStats::default()),
            shutdown_token: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Get current channel state.
    pub fn state(&self) -> ChannelState {
        *self.state.read()
    }

    pub fn stats(&self) -> Arc<ChannelStats> {
        self.stats.clone()
    }

    /// Signal shutdown.
    ///
    /// Closes an open connection and stops the reconnect loop, including a
    /// pending retry.
    pub fn shutdown(&self) {
        info!("SnapshotChannel shutdown requested");
        self.shutdown_token.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    fn set_state(&self, state: ChannelState) {
        *self.state.write() = state;
        Metrics::ws_state_set(state.as_str());
    }

    /// Connect and run until shutdown.
    ///
    /// Only returns an error for an endpoint that can never be valid;
    /// transport failures are retried forever.
    pub async fn connect(&self) -> WsResult<()> {
        self.config.validate()?;

        loop {
            if self.is_shutdown() {
                info!("Shutdown requested, exiting connect loop");
                self.set_state(ChannelState::Disconnected);
                return Ok(());
            }

            self.set_state(ChannelState::Connecting);
            self.stats.record_attempt();

            match self.try_connect().await {
                Ok(()) => info!("Snapshot channel closed"),
                Err(e) => error!(error = %e, "Snapshot channel error"),
            }

            if self.is_shutdown() {
                info!("Shutdown requested after disconnect, not reconnecting");
                self.set_state(ChannelState::Disconnected);
                return Ok(());
            }

            self.set_state(ChannelState::Reconnecting);
            self.stats.record_reconnect();

            let delay = self.config.reconnect_delay();
            warn!(
                attempt = self.stats.reconnects(),
                delay_ms = delay.as_millis() as u64,
                "Reconnecting"
            );

            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = self.shutdown_token.cancelled() => {
                    info!("Shutdown requested during reconnect delay, exiting");
                    self.set_state(ChannelState::Disconnected);
                    return Ok(());
                }
            }
        }
    }

    async fn try_connect(&self) -> WsResult<()> {
        info!(url = %self.config.url, "Connecting to snapshot endpoint");

        let (ws_stream, _response) =
            connect_async_tls_with_config(&self.config.url, None, true, None).await?;
        let (mut write, mut read) = ws_stream.split();

        self.set_state(ChannelState::Open);
        info!("Snapshot channel open");

        loop {
            tokio::select! {
                () = self.shutdown_token.cancelled() => {
                    info!("Shutdown signal received in message loop");
                    if let Err(e) = write.send(Message::Close(None)).await {
                        warn!(error = %e, "Failed to send Close frame during shutdown");
                    }
                    return Ok(());
                }

                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            self.handle_text_message(&text);
                        }
                        Some(Ok(Message::Binary(data))) => {
                            debug!(len = data.len(), "Ignoring binary frame");
                        }
                        Some(Ok(Message::Ping(data))) => {
                            debug!("Received ping, sending pong");
                            write.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason) = frame
                                .map(|f| (f.code.into(), f.reason.to_string()))
                                .unwrap_or((1000, "Normal close".to_string()));
                            warn!(code, %reason, "Snapshot channel closed by server");
                            return Err(WsError::ConnectionClosed { code, reason });
                        }
                        Some(Err(e)) => {
                            error!(error = %e, "Snapshot channel read error");
                            return Err(e.into());
                        }
                        None => {
                            warn!("Snapshot stream ended");
                            return Ok(());
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    /// Decode one text frame and publish it.
    ///
    /// A malformed payload is dropped; the connection stays open and the
    /// next valid frame restores freshness.
    fn handle_text_message(&self, text: &str) {
        match decode_snapshot(text) {
            Ok(snapshot) => {
                self.stats.record_snapshot();
                debug!(
                    reflector = %snapshot.reflector_name,
                    clients = snapshot.clients.len(),
                    active_streams = snapshot.active_streams.len(),
                    "Snapshot received"
                );
                self.sink.publish(snapshot);
            }
            Err(e) => {
                self.stats.record_parse_failure();
                warn!(error = %e, len = text.len(), "Dropping malformed snapshot");
            }
        }
    }
}

/// Decode a wire message. Every inbound text frame is a full snapshot.
pub fn decode_snapshot(text: &str) -> WsResult<ReflectorSnapshot> {
    Ok(ReflectorSnapshot::from_json(text)?)
}
