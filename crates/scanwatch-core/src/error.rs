//! Error types for scanwatch-core

use thiserror::Error;

use crate::models::ScanId;

/// Result type alias using scanwatch-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in scanwatch-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Network or server call did not complete successfully
    #[error("Transport error: {0}")]
    Transport(String),

    /// Referenced scan does not exist on the server
    #[error("Scan not found: {0}")]
    NotFound(ScanId),

    /// Operation is not legal in the current confirmation state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

impl Error {
    /// Whether the failure came from the network or the server.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
