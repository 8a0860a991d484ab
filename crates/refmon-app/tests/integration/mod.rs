//! Integration tests for refmon.
//!
//! These tests verify the interaction between components:
//! - Snapshot channel lifecycle against a scripted server
//! - Snapshot flow through the bus, tracker and views
//! - Shutdown

pub mod common;
