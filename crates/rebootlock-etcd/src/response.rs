//! JSON bodies returned by the etcd v2 keys API.

use serde::Deserialize;

/// Successful response to a keys request.
#[derive(Debug, Clone, Deserialize)]
pub struct KeysResponse {
    /// What etcd did, e.g. `get`, `create`, `compareAndSwap`.
    pub action: String,
    /// The node after the operation.
    pub node: Node,
}

/// A key in the etcd v2 tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub key: String,
    /// Absent for directory nodes.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub dir: bool,
    pub modified_index: u64,
    pub created_index: u64,
}

/// Error body etcd sends with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_code: u32,
    pub message: String,
    #[serde(default)]
    pub cause: Option<String>,
    /// Cluster index at the time of the error.
    #[serde(default)]
    pub index: Option<u64>,
}
