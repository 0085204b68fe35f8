//! Error types for the tracker library.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// Geometry that cannot be resolved to an area and a centre point.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
