use thiserror::Error;

/// Errors produced while constructing or validating foundation types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid file name {name:?}: {reason}")]
    InvalidFileName { name: String, reason: String },

    #[error("invalid date {value:?}: expected RFC 3339 timestamp or YYYY-MM-DD")]
    InvalidDate { value: String },
}

pub type TypesResult<T> = Result<T, TypesError>;
