//! Error types for list-view operations.

use std::path::PathBuf;

/// Result type alias for list-view operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors that can occur while driving a list view.
///
/// Empty result sets and out-of-range page navigation are valid states and
/// never produce an error.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A mutation targeted a record id that is not in the store.
    #[error("Record '{id}' not found")]
    NotFound { id: String },

    /// A record with this id already exists in the store.
    #[error("Record '{id}' already exists")]
    DuplicateId { id: String },

    /// An argument was rejected at the call boundary.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A key-value store could not persist a change to `key`. The store's
    /// contents are as they were before the call.
    #[error("Storage error for key '{key}': {message}")]
    Storage { key: String, message: String },

    /// File I/O error.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl GridError {
    /// Create a not-found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a duplicate-id error.
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a storage error.
    pub fn storage(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this is a [`GridError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a [`GridError::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns true if this is a [`GridError::Storage`].
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}
