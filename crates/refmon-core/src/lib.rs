//! Core data model for the reflector live monitor.
//!
//! This crate provides the types shared by every other refmon crate:
//! - `ReflectorSnapshot`: full-state report pushed by the reflector
//! - `ModuleStat`, `PeerStat`, `StreamInfo`: snapshot rows
//! - `Timestamp`: seconds-since-epoch wire timestamp
//! - `SnapshotSink`: the seam between transport and presentation

pub mod error;
pub mod sink;
pub mod snapshot;
pub mod timestamp;

pub use error::{CoreError, Result};
pub use sink::SnapshotSink;
pub use snapshot::{ModuleStat, PeerStat, ReflectorSnapshot, StreamInfo};
pub use timestamp::Timestamp;
