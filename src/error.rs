use thiserror::Error;

/// Errors for malformed authoritative-shape input to a refactor operation.
///
/// These are programmer/integration errors, not expected edit outcomes: an
/// edit whose preconditions fail is reported as a
/// [`NoChange`](crate::edit::NoChange) instead.
#[derive(Error, Debug, Clone)]
pub enum ShapeError {
    #[error("port shape contains duplicate name '{0}'")]
    DuplicateName(String),

    #[error("rename mapping references unknown child '{0}'")]
    UnknownChild(String),

    #[error("rename mapping maps both '{first}' and '{second}' onto '{target}'")]
    ConflictingMapping {
        first: String,
        second: String,
        target: String,
    },
}

/// Errors from the raw-activity file and byte helpers.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("could not read or write activity file '{path}': {message}")]
    File { path: String, message: String },

    #[error("activity serialization failed: {0}")]
    Encode(String),

    #[error("activity deserialization failed: {0}")]
    Decode(String),
}

/// Errors raised when converting a custom caller format into a raw activity.
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("invalid activity data: {0}")]
    ValidationError(String),
}
