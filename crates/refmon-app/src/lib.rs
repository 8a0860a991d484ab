//! refmon - live terminal monitor for a digital-voice reflector.
//!
//! Main application that wires the components together:
//! - Snapshot channel to the reflector's WebSocket endpoint
//! - Update bus fanning snapshots out to subscribers
//! - Activity tracker deriving peer/module activity
//! - Views rendered to stdout

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
