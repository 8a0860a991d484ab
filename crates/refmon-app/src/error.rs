//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] Box<refmon_ws::WsError>),

    #[error("Dashboard error: {0}")]
    Dashboard(#[from] refmon_dashboard::DashboardError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] refmon_telemetry::TelemetryError),

    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<refmon_ws::WsError> for AppError {
    fn from(e: refmon_ws::WsError) -> Self {
        Self::WebSocket(Box::new(e))
    }
}

pub type AppResult<T> = Result<T, AppError>;
