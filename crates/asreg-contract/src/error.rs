use std::fmt;

use asreg_codec::CodecError;
use asreg_index::IndexError;
use asreg_store::StoreError;
use asreg_types::{ItemId, TypeError};

use crate::command::{Arity, Entrypoint};

/// Error classes returned to the host. The tag is the text prefix of every
/// error message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadArity,
    EmptyField,
    BadInteger,
    UnknownVerb,
    NotFound,
    DuplicateId,
    DecodeFailure,
    StorageFailure,
}

impl ErrorKind {
    /// The wire tag, e.g. `BAD_ARITY`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadArity => "BAD_ARITY",
            Self::EmptyField => "EMPTY_FIELD",
            Self::BadInteger => "BAD_INTEGER",
            Self::UnknownVerb => "UNKNOWN_VERB",
            Self::NotFound => "NOT_FOUND",
            Self::DuplicateId => "DUPLICATE_ID",
            Self::DecodeFailure => "DECODE_FAILURE",
            Self::StorageFailure => "STORAGE_FAILURE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while validating or applying a registry command.
///
/// Every variant renders as a single line starting with its
/// [`ErrorKind`] tag followed by `": "`.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("BAD_ARITY: {verb} expects {expected} argument(s), got {actual}")]
    BadArity {
        verb: &'static str,
        expected: Arity,
        actual: usize,
    },

    #[error("EMPTY_FIELD: {field} must be a non-empty string")]
    EmptyField { field: &'static str },

    #[error("BAD_INTEGER: {field} is not an acceptable integer: {value:?}")]
    BadInteger { field: &'static str, value: String },

    #[error("UNKNOWN_VERB: {entrypoint} received unknown function {verb:?}")]
    UnknownVerb { entrypoint: Entrypoint, verb: String },

    #[error("NOT_FOUND: no value stored at {key:?}")]
    NotFound { key: String },

    #[error("DUPLICATE_ID: item {:?} already exists", .0.as_str())]
    DuplicateId(ItemId),

    #[error("DECODE_FAILURE: {0}")]
    Decode(#[from] CodecError),

    #[error("STORAGE_FAILURE: {0}")]
    Storage(#[from] StoreError),
}

impl ContractError {
    /// The error class reported to the host.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadArity { .. } => ErrorKind::BadArity,
            Self::EmptyField { .. } => ErrorKind::EmptyField,
            Self::BadInteger { .. } => ErrorKind::BadInteger,
            Self::UnknownVerb { .. } => ErrorKind::UnknownVerb,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DuplicateId(_) => ErrorKind::DuplicateId,
            Self::Decode(_) => ErrorKind::DecodeFailure,
            Self::Storage(_) => ErrorKind::StorageFailure,
        }
    }
}

impl From<TypeError> for ContractError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::EmptyField { field } => Self::EmptyField { field },
            TypeError::InvalidInteger { field, value } => Self::BadInteger { field, value },
            TypeError::Negative { field, value } => Self::BadInteger {
                field,
                value: value.to_string(),
            },
        }
    }
}

impl From<IndexError> for ContractError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::DuplicateId(id) => Self::DuplicateId(id),
            IndexError::Codec(e) => Self::Decode(e),
            IndexError::Store(e) => Self::Storage(e),
        }
    }
}

/// Result alias for contract operations.
pub type ContractResult<T> = Result<T, ContractError>;
