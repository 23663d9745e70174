use thiserror::Error;

/// Failures crossing the persistence boundary. These are always returned
/// as values; nothing behind a repository trait panics or propagates a
/// raw driver error to callers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("insert failed: {0}")]
    InsertFailed(String),

    #[error("update failed: {0}")]
    UpdateFailed(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("backend error: {0}")]
    Backend(String),
}
