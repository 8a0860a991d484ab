//! Snapshot update bus.
//!
//! The bus fans each published snapshot out to every registered subscriber,
//! in registration order, synchronously on the publisher's task. Only the
//! latest snapshot is retained; there is no queue and no replay.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use refmon_core::{ReflectorSnapshot, SnapshotSink};
use tokio::sync::watch;
use tracing::trace;

/// Receives every snapshot published after it was registered.
pub trait SnapshotSubscriber: Send {
    fn on_snapshot(&mut self, snapshot: &Arc<ReflectorSnapshot>);
}

struct FnSubscriber<F>(F);

impl<F> SnapshotSubscriber for FnSubscriber<F>
where
    F: FnMut(&Arc<ReflectorSnapshot>) + Send,
{
    fn on_snapshot(&mut self, snapshot: &Arc<ReflectorSnapshot>) {
        (self.0)(snapshot)
    }
}

/// Single-channel snapshot broadcaster.
pub struct UpdateBus {
    subscribers: Mutex<Vec<Box<dyn SnapshotSubscriber>>>,
    /// Registrations made since the last publish. Kept apart from
    /// `subscribers` so a subscriber may register another from inside
    /// `on_snapshot` without deadlocking.
    pending: Mutex<Vec<Box<dyn SnapshotSubscriber>>>,
    latest_tx: watch::Sender<Option<Arc<ReflectorSnapshot>>>,
    published: AtomicU64,
    /// Registrations so far; readable without either lock.
    registered: AtomicUsize,
}

impl UpdateBus {
    pub fn new() -> Self {
        let (latest_tx, _rx) = watch::channel(None);
        Self {
            subscribers: Mutex::new(Vec::new()),
            pending: Mutex::new(Vec::new()),
            latest_tx,
            published: AtomicU64::new(0),
            registered: AtomicUsize::new(0),
        }
    }

    /// Register a subscriber. It first sees the next published snapshot.
    pub fn subscribe(&self, subscriber: impl SnapshotSubscriber + 'static) {
        self.pending.lock().push(Box::new(subscriber));
        self.registered.fetch_add(1, Ordering::Relaxed);
    }

    /// Register a closure as a subscriber.
    pub fn subscribe_fn<F>(&self, f: F)
    where
        F: FnMut(&Arc<ReflectorSnapshot>) + Send + 'static,
    {
        self.subscribe(FnSubscriber(f));
    }

    /// Observe the latest published snapshot without registering a
    /// subscriber. Slow observers only ever see the most recent value.
    pub fn watch(&self) -> watch::Receiver<Option<Arc<ReflectorSnapshot>>> {
        self.latest_tx.subscribe()
    }

    /// Most recently published snapshot.
    pub fn latest(&self) -> Option<Arc<ReflectorSnapshot>> {
        self.latest_tx.borrow().clone()
    }

    /// Number of snapshots published so far.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Number of registered subscribers. Safe to call from a subscriber.
    pub fn subscriber_count(&self) -> usize {
        self.registered.load(Ordering::Relaxed)
    }

    /// Deliver `snapshot` to every subscriber, then to watchers.
    ///
    /// Holding the subscriber lock for the whole pass serializes publishes:
    /// no subscriber ever runs for two snapshots at once.
    pub fn publish_shared(&self, snapshot: Arc<ReflectorSnapshot>) {
        let mut subscribers = self.subscribers.lock();
        subscribers.append(&mut self.pending.lock());

        for subscriber in subscribers.iter_mut() {
            subscriber.on_snapshot(&snapshot);
        }

        let seq = self.published.fetch_add(1, Ordering::Relaxed) + 1;
        trace!(seq, subscribers = subscribers.len(), "Snapshot dispatched");

        self.latest_tx.send_replace(Some(snapshot));
    }
}

impl Default for UpdateBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSink for UpdateBus {
    fn publish(&self, snapshot: ReflectorSnapshot) {
        self.publish_shared(Arc::new(snapshot));
    }
}
