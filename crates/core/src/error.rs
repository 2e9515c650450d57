//! Error types for the metadata store.
//!
//! The router maps each variant to a distinct HTTP status, so variants are
//! split by what the caller can do about them rather than by backend.

use tokio_rusqlite::rusqlite;

/// Errors returned by [`MetadataStore`](crate::store::MetadataStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record exists for the given identifier.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// Records must be keyed by a non-empty identifier.
    #[error("INVALID_IDENTIFIER: identifier must not be empty")]
    EmptyIdentifier,

    /// The key-value service rejected or could not complete the request
    /// (throttling, permission denial, network failure).
    #[error("STORE_TRANSPORT: {0}")]
    TransportFault(String),

    /// A stored item could not be decoded into a document.
    #[error("MALFORMED_RECORD: {0}")]
    MalformedRecord(String),

    /// SQLite operation failed.
    #[error("STORE_DATABASE: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_DATABASE: migration failed: {0}")]
    MigrationFailed(String),
}

impl StoreError {
    /// Whether this error is a lookup miss rather than a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<tokio_rusqlite::Error<StoreError>> for StoreError {
    fn from(err: tokio_rusqlite::Error<StoreError>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => StoreError::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => StoreError::Database(tokio_rusqlite::Error::Close(c)),
            _ => StoreError::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for StoreError {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        StoreError::Database(err)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(tokio_rusqlite::Error::Error(err))
    }
}
