//! Ingestion error types

use contracts::NotifierError;
use thiserror::Error;

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Reading the input stream failed
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// The dispatcher rejected a batch or failed to stop
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] NotifierError),
}

/// Ingestion Result alias
pub type Result<T> = std::result::Result<T, IngestionError>;
