use thiserror::Error;

/// Errors produced by type construction and field parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("{field} must be a non-empty string")]
    EmptyField { field: &'static str },

    #[error("{field} expects an integer, got {value:?}")]
    InvalidInteger { field: &'static str, value: String },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: i64 },
}
