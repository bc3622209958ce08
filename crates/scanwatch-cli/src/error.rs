use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] scanwatch_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Scan ID cannot be empty")]
    EmptyScanId,
    #[error("Invalid scan id: {0}")]
    InvalidScanId(String),
    #[error("Scan not found: {0}")]
    ScanNotFound(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Nothing to update. Pass at least one option to `scanwatch config set`.")]
    NothingToUpdate,
    #[error("Aborted")]
    Aborted,
}
