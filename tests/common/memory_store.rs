//! In-memory coordination stores for testing the semaphore client.

use rebootlock_core::error::{StoreError, StoreResult};
use rebootlock_core::traits::{CoordinationStore, StoredValue};
use rebootlock_core::version::Version;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Linearizable in-memory store.
///
/// Versions come from one counter shared by all keys, like an etcd index.
pub struct MemoryStore {
    inner: Mutex<MemoryState>,
}

struct MemoryState {
    entries: HashMap<String, StoredValue>,
    index: u64,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryState {
                entries: HashMap::new(),
                index: 0,
            }),
        }
    }

    /// Creates an empty store wrapped in an `Arc` for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Returns the raw entry for `key`, bypassing the trait.
    pub fn get(&self, key: &str) -> Option<StoredValue> {
        self.inner.lock().unwrap().entries.get(key).cloned()
    }

    /// Overwrites `key` unconditionally, as a foreign writer would.
    pub fn put(&self, key: &str, payload: &str) -> Version {
        let mut state = self.inner.lock().unwrap();
        state.index += 1;
        let version = Version::new(state.index);
        state.entries.insert(
            key.to_string(),
            StoredValue {
                payload: payload.to_string(),
                version,
            },
        );
        version
    }

    /// Number of keys in the store.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinationStore for MemoryStore {
    async fn create_if_absent(&self, key: &str, payload: &str) -> StoreResult<Version> {
        // Let concurrent callers interleave.
        tokio::task::yield_now().await;

        let mut state = self.inner.lock().unwrap();
        if state.entries.contains_key(key) {
            return Err(StoreError::AlreadyExists {
                key: key.to_string(),
            });
        }

        state.index += 1;
        let version = Version::new(state.index);
        state.entries.insert(
            key.to_string(),
            StoredValue {
                payload: payload.to_string(),
                version,
            },
        );
        Ok(version)
    }

    async fn read(&self, key: &str) -> StoreResult<StoredValue> {
        tokio::task::yield_now().await;

        let state = self.inner.lock().unwrap();
        state
            .entries
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                key: key.to_string(),
            })
    }

    async fn conditional_replace(
        &self,
        key: &str,
        payload: &str,
        expected: Version,
    ) -> StoreResult<Version> {
        tokio::task::yield_now().await;

        let mut state = self.inner.lock().unwrap();
        let current = match state.entries.get(key) {
            Some(entry) => entry.version,
            None => {
                return Err(StoreError::NotFound {
                    key: key.to_string(),
                });
            }
        };

        if current != expected {
            return Err(StoreError::VersionMismatch {
                key: key.to_string(),
                expected,
            });
        }

        state.index += 1;
        let version = Version::new(state.index);
        state.entries.insert(
            key.to_string(),
            StoredValue {
                payload: payload.to_string(),
                version,
            },
        );
        Ok(version)
    }
}

/// Wraps a store and counts every call that reaches it.
pub struct CountingStore<S> {
    inner: S,
    creates: AtomicUsize,
    reads: AtomicUsize,
    replaces: AtomicUsize,
}

impl<S: CoordinationStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            creates: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            replaces: AtomicUsize::new(0),
        }
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn replaces(&self) -> usize {
        self.replaces.load(Ordering::SeqCst)
    }

    /// Total number of store operations.
    pub fn calls(&self) -> usize {
        self.creates() + self.reads() + self.replaces()
    }
}

impl<S: CoordinationStore> CoordinationStore for CountingStore<S> {
    async fn create_if_absent(&self, key: &str, payload: &str) -> StoreResult<Version> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create_if_absent(key, payload).await
    }

    async fn read(&self, key: &str) -> StoreResult<StoredValue> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(key).await
    }

    async fn conditional_replace(
        &self,
        key: &str,
        payload: &str,
        expected: Version,
    ) -> StoreResult<Version> {
        self.replaces.fetch_add(1, Ordering::SeqCst);
        self.inner.conditional_replace(key, payload, expected).await
    }
}

/// Store whose every operation fails with the error built by `make_error`.
///
/// Reads return `payload` instead when it is set.
pub struct ScriptedStore {
    payload: Option<String>,
    make_error: fn() -> StoreError,
}

impl ScriptedStore {
    /// Reads return `payload` at version 1; writes fail.
    pub fn with_payload(payload: &str) -> Self {
        Self {
            payload: Some(payload.to_string()),
            make_error: timed_out,
        }
    }

    /// Every operation fails with `make_error()`.
    pub fn failing(make_error: fn() -> StoreError) -> Self {
        Self {
            payload: None,
            make_error,
        }
    }
}

/// A transport timeout, as a real binding would report it.
pub fn timed_out() -> StoreError {
    StoreError::Transport(Box::new(std::io::Error::new(
        std::io::ErrorKind::TimedOut,
        "request timed out",
    )))
}

impl CoordinationStore for ScriptedStore {
    async fn create_if_absent(&self, _key: &str, _payload: &str) -> StoreResult<Version> {
        Err((self.make_error)())
    }

    async fn read(&self, _key: &str) -> StoreResult<StoredValue> {
        match &self.payload {
            Some(payload) => Ok(StoredValue {
                payload: payload.clone(),
                version: Version::new(1),
            }),
            None => Err((self.make_error)()),
        }
    }

    async fn conditional_replace(
        &self,
        _key: &str,
        _payload: &str,
        _expected: Version,
    ) -> StoreResult<Version> {
        Err((self.make_error)())
    }
}
