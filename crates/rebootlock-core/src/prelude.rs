//! Convenience prelude for semaphore coordination types.

pub use crate::client::{SemaphoreClient, SemaphoreClientBuilder};
pub use crate::config::SemaphoreConfig;
pub use crate::error::{SemaphoreError, SemaphoreResult, StoreError, StoreResult};
pub use crate::record::Semaphore;
pub use crate::traits::{CoordinationStore, StoredValue};
pub use crate::version::Version;
