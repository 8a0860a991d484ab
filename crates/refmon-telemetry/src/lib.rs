//! Prometheus metrics and structured logging for refmon.
//!
//! - Prometheus counters for the snapshot channel and renderers
//! - Structured logging with tracing (JSON in production, pretty otherwise)
//! - Session summary output at shutdown

pub mod error;
pub mod logging;
pub mod metrics;
pub mod session_stats;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging_with, DEFAULT_FILTER};
pub use metrics::Metrics;
pub use session_stats::{SessionStats, SessionSummary};
