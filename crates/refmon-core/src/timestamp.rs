//! Wire timestamp.
//!
//! The reflector serializes `SystemTime` values, which arrive as
//! `{"secs_since_epoch": n, "nanos_since_epoch": m}`. Only whole seconds
//! are meaningful for display, so the nanosecond part is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub secs_since_epoch: i64,
}

impl Timestamp {
    #[inline]
    pub fn from_secs(secs_since_epoch: i64) -> Self {
        Self { secs_since_epoch }
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Self::from_secs(Utc::now().timestamp())
    }

    #[inline]
    pub fn secs(&self) -> i64 {
        self.secs_since_epoch
    }

    /// Whole seconds elapsed from this timestamp until `now`.
    ///
    /// Timestamps in the future (clock skew between reflector and viewer)
    /// yield zero rather than a negative span.
    #[inline]
    pub fn elapsed_until(&self, now: Timestamp) -> u64 {
        now.secs_since_epoch
            .saturating_sub(self.secs_since_epoch)
            .max(0) as u64
    }

    /// Convert to a UTC datetime. `None` when out of chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.secs_since_epoch, 0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.secs_since_epoch)
    }
}
