//! Ingestion error types

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors of an ingestion run. Malformed rows are never errors.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Cannot read spreadsheet {path}: {reason}")]
    SourceUnreadable { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to persist artifact: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Result type alias for ingestion operations
pub type IngestResult<T> = Result<T, IngestError>;
