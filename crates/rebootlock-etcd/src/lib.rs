//! etcd backend for the reboot semaphore.
//!
//! Talks to the etcd v2 keys API over HTTP. Create-if-absent maps to
//! `prevExist=false`, reads use quorum reads, and conditional replace maps to
//! `prevIndex` compare-and-swap against the node's `modifiedIndex`.

pub mod errors;
pub mod provider;
pub mod response;
pub mod store;

pub use errors::EtcdError;
pub use provider::{EtcdStoreBuilder, connect};
pub use store::EtcdStore;
