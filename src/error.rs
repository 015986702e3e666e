use thiserror::Error;

/// Failure modes of a monitoring run.
///
/// `Config` and `Fetch` abort the run; `Shutdown` and `Delivery` are logged
/// and isolated to the server or channel they concern.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("failed to fetch servers: {0}")]
    Fetch(String),
    #[error("failed to shut down server {server_id}: {reason}")]
    Shutdown { server_id: u64, reason: String },
    #[error("failed to deliver alert: {0}")]
    Delivery(String),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
