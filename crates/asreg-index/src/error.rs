//! Error types for the index crate.

use asreg_types::ItemId;

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The id is already listed in the index.
    #[error("id already indexed: {0}")]
    DuplicateId(ItemId),

    /// The persisted index could not be decoded or encoded.
    #[error("index codec error: {0}")]
    Codec(#[from] asreg_codec::CodecError),

    /// Ledger operation failed.
    #[error("store error: {0}")]
    Store(#[from] asreg_store::StoreError),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
