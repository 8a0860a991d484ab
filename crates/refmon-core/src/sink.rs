//! Snapshot delivery seam.

use crate::ReflectorSnapshot;
use std::sync::Arc;

/// Receives every successfully decoded snapshot, in receipt order.
///
/// Implementations run synchronously on the transport's task: the transport
/// does not read the next frame until `publish` returns.
pub trait SnapshotSink: Send + Sync {
    fn publish(&self, snapshot: ReflectorSnapshot);
}

impl<T: SnapshotSink + ?Sized> SnapshotSink for Arc<T> {
    fn publish(&self, snapshot: ReflectorSnapshot) {
        (**self).publish(snapshot)
    }
}
