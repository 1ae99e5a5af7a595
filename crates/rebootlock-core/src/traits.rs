//! Capability surface of the external coordination store.

use std::future::Future;
use std::sync::Arc;

use crate::error::StoreResult;
use crate::version::Version;

// ============================================================================
// Stored Value
// ============================================================================

/// A payload read from the store together with its current revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredValue {
    /// Raw payload exactly as stored.
    pub payload: String,
    /// Revision assigned by the store on the last write.
    pub version: Version,
}

// ============================================================================
// Coordination Store Trait
// ============================================================================

/// The three operations the semaphore client needs from a coordination store.
///
/// Implementations talk to a linearizable store (etcd in production, an
/// in-memory double in tests). All conflict detection happens inside the
/// store: `create_if_absent` and `conditional_replace` must be atomic, and
/// every method must be safe to call from many tasks at once.
///
/// # Errors
///
/// Implementations report precondition failures with the dedicated
/// [`StoreError`](crate::error::StoreError) variants and everything else as
/// `Transport` or `Backend`. A timeout is a `Transport` error, never a
/// `VersionMismatch`.
pub trait CoordinationStore: Send + Sync {
    /// Creates `key` with `payload` only if it does not exist yet.
    ///
    /// The record never expires. Returns the version of the new record, or
    /// `StoreError::AlreadyExists` when the key is present.
    fn create_if_absent(
        &self,
        key: &str,
        payload: &str,
    ) -> impl Future<Output = StoreResult<Version>> + Send;

    /// Reads the current payload and version of `key`.
    ///
    /// Returns `StoreError::NotFound` when the key does not exist.
    fn read(&self, key: &str) -> impl Future<Output = StoreResult<StoredValue>> + Send;

    /// Replaces the payload of `key` if its current version is `expected`.
    ///
    /// Returns the new version on success. On `StoreError::VersionMismatch`
    /// nothing was written.
    fn conditional_replace(
        &self,
        key: &str,
        payload: &str,
        expected: Version,
    ) -> impl Future<Output = StoreResult<Version>> + Send;
}

// Lets several clients share one store connection.
impl<S: CoordinationStore + ?Sized> CoordinationStore for Arc<S> {
    fn create_if_absent(
        &self,
        key: &str,
        payload: &str,
    ) -> impl Future<Output = StoreResult<Version>> + Send {
        (**self).create_if_absent(key, payload)
    }

    fn read(&self, key: &str) -> impl Future<Output = StoreResult<StoredValue>> + Send {
        (**self).read(key)
    }

    fn conditional_replace(
        &self,
        key: &str,
        payload: &str,
        expected: Version,
    ) -> impl Future<Output = StoreResult<Version>> + Send {
        (**self).conditional_replace(key, payload, expected)
    }
}
