//! The shared semaphore record and its wire encoding.

use serde::{Deserialize, Serialize};

use crate::error::{SemaphoreError, SemaphoreResult};
use crate::version::Version;

/// The single piece of shared state behind the reboot semaphore.
///
/// Serialized as `{"maxHolders": <n>, "holders": [..]}`. The version is store
/// metadata and never part of the payload; it is attached by
/// [`fetch`](crate::client::SemaphoreClient::fetch) and consumed by
/// [`commit_update`](crate::client::SemaphoreClient::commit_update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Semaphore {
    /// How many holders may occupy the semaphore at once.
    pub max_holders: u32,
    /// Current holder identifiers. Opaque to this crate.
    pub holders: Vec<String>,
    #[serde(skip)]
    version: Option<Version>,
}

impl Semaphore {
    /// Creates an unversioned record with no holders.
    pub fn new(max_holders: u32) -> Self {
        Self {
            max_holders,
            holders: Vec::new(),
            version: None,
        }
    }

    /// Attaches a store version to the record.
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// The version observed when this record was read, if any.
    pub fn version(&self) -> Option<Version> {
        self.version
    }

    /// Serializes the record without its version.
    pub fn to_payload(&self) -> SemaphoreResult<String> {
        serde_json::to_string(self).map_err(SemaphoreError::Encode)
    }

    /// Parses a stored payload and tags it with the version it was read at.
    ///
    /// Missing fields, unknown fields, and malformed JSON are all decode
    /// errors; nothing is defaulted.
    pub fn from_payload(payload: &str, version: Version) -> SemaphoreResult<Self> {
        let semaphore: Semaphore =
            serde_json::from_str(payload).map_err(SemaphoreError::Decode)?;
        Ok(semaphore.with_version(version))
    }
}
