//! Main application orchestration.
//!
//! Coordinates all components:
//! - Snapshot channel (WebSocket lifecycle, reconnect)
//! - Update bus
//! - Activity tracker, registered ahead of every view
//! - View renderers sharing one output surface
//! - Session summary at shutdown

use crate::config::AppConfig;
use crate::error::AppResult;
use parking_lot::Mutex;
use refmon_dashboard::{
    ActivityTracker, JsonSurface, OutputFormat, RenderSurface, SharedTracker, TextSurface,
    TrackerSubscriber, UpdateBus, ViewRenderer,
};
use refmon_telemetry::SessionSummary;
use refmon_ws::SnapshotChannel;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Main application.
pub struct Application {
    config: AppConfig,
    bus: Arc<UpdateBus>,
    tracker: SharedTracker,
    channel: Arc<SnapshotChannel>,
}

impl Application {
    /// Create an application rendering to stdout in the configured format.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let surface: Box<dyn RenderSurface> = match config.dashboard.output {
            OutputFormat::Text => Box::new(TextSurface::stdout(config.dashboard.clear_screen)),
            OutputFormat::Json => Box::new(JsonSurface::new(std::io::stdout())),
        };
        Self::with_surface(config, surface)
    }

    /// Create an application rendering to `surface`.
    pub fn with_surface<S>(config: AppConfig, surface: S) -> AppResult<Self>
    where
        S: RenderSurface + 'static,
    {
        config.validate()?;

        let bus = Arc::new(UpdateBus::new());
        let tracker = ActivityTracker::shared();

        // Must precede the renderers: they read the frame it computes.
        bus.subscribe(TrackerSubscriber::new(tracker.clone()));

        let surface = Arc::new(Mutex::new(surface));
        for kind in &config.dashboard.views {
            bus.subscribe(ViewRenderer::new(
                kind.build(),
                tracker.clone(),
                surface.clone(),
            ));
        }

        let channel = Arc::new(SnapshotChannel::new(config.channel_config(), bus.clone()));

        info!(
            url = %channel.config().url,
            reconnect_delay_ms = config.websocket.reconnect_delay_ms,
            views = ?config.dashboard.view_names(),
            subscribers = bus.subscriber_count(),
            "Application configured"
        );

        Ok(Self {
            config,
            bus,
            tracker,
            channel,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn bus(&self) -> Arc<UpdateBus> {
        self.bus.clone()
    }

    pub fn tracker(&self) -> SharedTracker {
        self.tracker.clone()
    }

    pub fn channel(&self) -> Arc<SnapshotChannel> {
        self.channel.clone()
    }

    /// Run until Ctrl-C.
    pub async fn run(self) -> AppResult<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run until `shutdown` completes.
    ///
    /// Only an endpoint that can never be valid ends the run early; transport
    /// failures are retried by the channel.
    pub async fn run_until<F>(self, shutdown: F) -> AppResult<()>
    where
        F: Future<Output = ()>,
    {
        info!("Starting monitor");
        let summary = SessionSummary::new(self.config.dashboard.view_names());

        let channel = self.channel.clone();
        let mut ws_handle = tokio::spawn(async move { channel.connect().await });

        let finished = tokio::select! {
            () = shutdown => None,
            joined = &mut ws_handle => Some(joined),
        };

        let joined = match finished {
            Some(joined) => {
                warn!("Snapshot channel stopped without shutdown");
                joined
            }
            None => {
                info!("Shutdown signal received");
                self.channel.shutdown();
                ws_handle.await
            }
        };

        let stats = self.channel.stats();
        info!(
            published = self.bus.published(),
            snapshots = stats.snapshots_received(),
            parse_failures = stats.parse_failures(),
            reconnects = stats.reconnects(),
            tracked_peers = self.tracker.read().tracked_peers(),
            state = self.channel.state().as_str(),
            "Shutting down"
        );
        summary.output_summary();

        joined??;
        Ok(())
    }
}
