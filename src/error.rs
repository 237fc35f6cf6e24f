use std::io;

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

/// Marker carried by every precondition failure raised at the storage layer.
pub const NULL_INPUT_MARKER: &str = "null input at storage layer";

#[derive(Debug, Error)]
pub enum StorageError {
    /// A required identifying argument was absent. Signals a caller bug.
    #[error("null input at storage layer: {argument} is missing")]
    NullInput { argument: &'static str },
    /// One or more fields failed their format rules.
    #[error("{}", .0.join("\n"))]
    InvalidParameters(Vec<String>),
    #[error("Trying to create a {entity_type} that exists: {identification}")]
    AlreadyExists {
        entity_type: &'static str,
        identification: String,
    },
    #[error("missing configuration value: {0}")]
    MissingConfig(&'static str),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl StorageError {
    pub fn null_input(argument: &'static str) -> Self {
        StorageError::NullInput { argument }
    }

    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, StorageError::NullInput { .. })
    }

    pub fn is_validation_failure(&self) -> bool {
        matches!(self, StorageError::InvalidParameters(_))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, StorageError::AlreadyExists { .. })
    }
}

/// Rejects a blank identifying argument the way a null would be rejected.
pub(crate) fn require(argument: &'static str, value: &str) -> StorageResult<()> {
    if value.trim().is_empty() {
        return Err(StorageError::null_input(argument));
    }
    Ok(())
}

/// True when SQLite refused a write because of a UNIQUE or PRIMARY KEY constraint.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => matches!(
            failure.extended_code,
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        ),
        _ => false,
    }
}
