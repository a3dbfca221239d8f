/// Errors from encoding or decoding registry records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The bytes are not JSON of the expected shape.
    #[error("malformed {record}: {reason}")]
    Malformed { record: &'static str, reason: String },

    /// A quoted legacy numeric did not parse as a decimal integer.
    #[error("field {field} holds non-integer text {value:?}")]
    InvalidInteger { field: &'static str, value: String },

    /// A decoded price was below zero.
    #[error("price must not be negative, got {0}")]
    NegativePrice(i64),

    /// Serialization failed.
    #[error("encode error: {0}")]
    Encode(String),
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
