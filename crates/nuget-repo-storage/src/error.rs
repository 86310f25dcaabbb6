use thiserror::Error;

/// Failures from the blob store itself, independent of any ingestion logic
/// built on top of it.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("storage io error: {0}")]
    Io(String),
}
