/// Errors from ledger facade and backend operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The host ledger reported a failure.
    #[error("ledger backend failure: {0:?}")]
    Backend(String),

    /// A lock guarding in-memory state was poisoned by a panicking writer.
    #[error("ledger state lock poisoned")]
    LockPoisoned,

    /// Serialization or deserialization of persisted state failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from a file-backed ledger.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
