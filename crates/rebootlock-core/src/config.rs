//! Client configuration.

/// Capacity used when a fresh semaphore record is created.
pub const DEFAULT_MAX_HOLDERS: u32 = 1;

/// Settings consumed by [`SemaphoreClient`](crate::client::SemaphoreClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemaphoreConfig {
    /// Capacity written by `initialize` when the record does not exist yet.
    ///
    /// Ignored once the record exists.
    pub max_holders: u32,
}

impl Default for SemaphoreConfig {
    fn default() -> Self {
        Self {
            max_holders: DEFAULT_MAX_HOLDERS,
        }
    }
}
