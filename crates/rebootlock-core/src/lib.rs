//! Core types for the distributed reboot semaphore.
//!
//! The semaphore is a single record in a linearizable key-value store.
//! [`SemaphoreClient`] reads it with its version, and writes it back only if
//! nobody else wrote in between. Deciding *what* to write is left to callers.

pub mod client;
pub mod config;
pub mod error;
pub mod key;
pub mod prelude;
pub mod record;
pub mod traits;
pub mod version;

pub use client::{SemaphoreClient, SemaphoreClientBuilder};
pub use error::{SemaphoreError, SemaphoreResult, StoreError, StoreResult};
pub use prelude::*;
