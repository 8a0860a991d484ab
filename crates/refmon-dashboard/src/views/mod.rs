//! Snapshot views.
//!
//! A view is a pure function of (snapshot, activity frame, render time).
//! `ViewRenderer` binds one view to the update bus and a surface.

mod modules;
mod summary;

pub use modules::ModulesView;
pub use summary::SummaryView;

use std::cmp::Ordering;
use std::sync::Arc;

use refmon_core::{ReflectorSnapshot, Timestamp};
use refmon_telemetry::Metrics;
use tracing::{trace, warn};

use crate::activity::{ActivityFrame, SharedTracker};
use crate::bus::SnapshotSubscriber;
use crate::surface::RenderSurface;
use crate::types::RenderedView;

/// Display order for module names and callsigns: case-insensitive, with
/// byte order breaking ties so the result is total and stable.
pub(crate) fn name_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Rebuilds one complete rendered view from a snapshot.
pub trait View: Send + Sync {
    fn name(&self) -> &'static str;

    /// Render the whole view. Must not depend on anything but the arguments.
    fn render(
        &self,
        snapshot: &ReflectorSnapshot,
        frame: &ActivityFrame,
        now: Timestamp,
    ) -> RenderedView;
}

/// Bus subscriber that renders a view and presents it.
pub struct ViewRenderer<S> {
    view: Box<dyn View>,
    tracker: SharedTracker,
    surface: S,
    clock: fn() -> Timestamp,
    passes: u64,
}

impl<S: RenderSurface> ViewRenderer<S> {
    pub fn new(view: Box<dyn View>, tracker: SharedTracker, surface: S) -> Self {
        Self {
            view,
            tracker,
            surface,
            clock: Timestamp::now,
            passes: 0,
        }
    }

    /// Replace the wall clock used for elapsed-time columns.
    pub fn with_clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    pub fn view_name(&self) -> &'static str {
        self.view.name()
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Render `snapshot` against the tracker's current frame.
    pub fn render(&self, snapshot: &ReflectorSnapshot) -> RenderedView {
        let frame = self.tracker.read().frame();
        self.view.render(snapshot, &frame, (self.clock)())
    }
}

impl<S: RenderSurface> SnapshotSubscriber for ViewRenderer<S> {
    fn on_snapshot(&mut self, snapshot: &Arc<ReflectorSnapshot>) {
        let rendered = self.render(snapshot);
        self.passes += 1;
        Metrics::render_pass(self.view.name());
        trace!(view = self.view.name(), pass = self.passes, "View rendered");

        if let Err(e) = self.surface.present(&rendered) {
            warn!(view = self.view.name(), error = %e, "Failed to present view");
        }
    }
}
