//! Error types for semaphore coordination.

use thiserror::Error;

use crate::version::Version;

/// Outcomes a coordination store can report besides success.
///
/// Every store binding must map its own failures onto these variants so the
/// client can tell an expected precondition failure from a broken transport.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Create-if-absent found the key already present.
    #[error("key already exists: {key}")]
    AlreadyExists { key: String },

    /// The key does not exist.
    #[error("key not found: {key}")]
    NotFound { key: String },

    /// The stored version no longer matches the expected one.
    #[error("version mismatch on {key}: expected {expected}")]
    VersionMismatch { key: String, expected: Version },

    /// Network failure or timeout talking to the store.
    ///
    /// The operation may or may not have taken effect.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The store answered with an error or response it should not have.
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The store binding was configured incorrectly.
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for coordination store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by [`SemaphoreClient`](crate::client::SemaphoreClient).
#[derive(Error, Debug)]
pub enum SemaphoreError {
    /// Another writer replaced the record after it was fetched.
    ///
    /// Retryable: fetch again, recompute the update, and commit.
    #[error("semaphore was modified concurrently (expected version {expected})")]
    Conflict { expected: Version },

    /// The semaphore record has not been created yet.
    #[error("semaphore not initialized at {key}")]
    NotInitialized { key: String },

    /// The record could not be serialized.
    #[error("failed to encode semaphore: {0}")]
    Encode(#[source] serde_json::Error),

    /// The stored payload is not a valid semaphore record.
    #[error("failed to decode semaphore: {0}")]
    Decode(#[source] serde_json::Error),

    /// The caller passed something that must never be written.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Any other store failure, passed through untouched.
    #[error(transparent)]
    Store(StoreError),
}

impl SemaphoreError {
    /// Returns `true` for the retryable concurrent-modification signal.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<StoreError> for SemaphoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionMismatch { expected, .. } => Self::Conflict { expected },
            StoreError::NotFound { key } => Self::NotInitialized { key },
            other => Self::Store(other),
        }
    }
}

/// Result type for semaphore client operations.
pub type SemaphoreResult<T> = Result<T, SemaphoreError>;
