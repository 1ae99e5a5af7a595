//! Fleet-wide reboot semaphore on top of a linearizable key-value store.
//!
//! A fleet of nodes shares one semaphore record holding a capacity and the
//! ids of the nodes that currently hold a slot. This crate provides the safe
//! read-modify-write substrate for that record: idempotent creation, versioned
//! reads, and version-guarded writes. Which nodes get a slot is up to the
//! caller.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rebootlock::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and create the record if this is the first node
//!     let client = rebootlock::connect(&["http://127.0.0.1:2379"], 1).await?;
//!
//!     loop {
//!         let mut semaphore = client.fetch().await?;
//!         if semaphore.holders.len() >= semaphore.max_holders as usize {
//!             println!("semaphore is full");
//!             break;
//!         }
//!         semaphore.holders.push("node-A".to_string());
//!
//!         match client.commit_update(&semaphore).await {
//!             Ok(version) => {
//!                 println!("holding a slot at version {version}");
//!                 break;
//!             }
//!             // Someone else wrote first; start over from fresh state
//!             Err(e) if e.is_conflict() => continue,
//!             Err(e) => return Err(e.into()),
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! ## etcd
//!
//! ```rust,no_run
//! use rebootlock::{EtcdStore, SemaphoreClient};
//! use std::time::Duration;
//!
//! let store = EtcdStore::builder()
//!     .endpoints(&["http://10.0.0.1:2379", "http://10.0.0.2:2379"])
//!     .timeout(Duration::from_secs(3))
//!     .build()?;
//! let client = SemaphoreClient::builder().store(store).max_holders(2).build()?;
//! # Ok::<(), rebootlock::SemaphoreError>(())
//! ```
//!
//! Any other store with atomic create-if-absent and compare-and-swap can be
//! plugged in by implementing [`CoordinationStore`].
//!
//! # Crate Organization
//!
//! This is a meta-crate that re-exports types from:
//! - `rebootlock-core`: record, client, store trait, and errors
//! - `rebootlock-etcd`: etcd backend

// Re-export core types and traits
pub use rebootlock_core::*;

// Re-export etcd backend
pub use rebootlock_etcd::{EtcdError, EtcdStore, EtcdStoreBuilder, connect};
