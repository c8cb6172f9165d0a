//! Error types for the storm recon map.

use thiserror::Error;

/// Result type alias using ReconError.
pub type ReconResult<T> = Result<T, ReconError>;

/// Primary error type for recon map operations.
#[derive(Debug, Error)]
pub enum ReconError {
    // === Request Errors ===
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Storm not found: {0}")]
    StormNotFound(String),

    #[error("Mission not found: {0}")]
    MissionNotFound(String),

    #[error("Marker not found: {0}")]
    MarkerNotFound(usize),

    #[error("No mission selected")]
    NoSelection,

    // === Data Errors ===
    #[error("Failed to fetch {path}: {message}")]
    FetchFailed { path: String, message: String },

    #[error("Invalid observation data: {0}")]
    InvalidData(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    // === Infrastructure Errors ===
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ReconError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            ReconError::InvalidParameter { .. }
            | ReconError::NoSelection => 400,

            ReconError::StormNotFound(_)
            | ReconError::MissionNotFound(_)
            | ReconError::MarkerNotFound(_) => 404,

            ReconError::FetchFailed { .. } | ReconError::InvalidData(_) => 502,

            _ => 500,
        }
    }
}

impl From<std::io::Error> for ReconError {
    fn from(err: std::io::Error) -> Self {
        ReconError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for ReconError {
    fn from(err: serde_json::Error) -> Self {
        ReconError::InvalidData(format!("JSON error: {}", err))
    }
}
