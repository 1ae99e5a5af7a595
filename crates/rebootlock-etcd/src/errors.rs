//! etcd error mapping.
//!
//! The v2 keys API reports failures as a JSON body with a numeric
//! `errorCode`. Three codes are preconditions the semaphore client relies on;
//! everything else is a backend failure.

use rebootlock_core::error::StoreError;
use rebootlock_core::version::Version;
use reqwest::StatusCode;
use thiserror::Error;

use crate::response::ErrorBody;

/// The key does not exist.
pub const ECODE_KEY_NOT_FOUND: u32 = 100;

/// `prevIndex` or `prevValue` did not match.
pub const ECODE_TEST_FAILED: u32 = 101;

/// `prevExist=false` and the key exists.
pub const ECODE_NODE_EXIST: u32 = 105;

/// Failures specific to the etcd binding.
#[derive(Error, Debug)]
pub enum EtcdError {
    /// etcd returned a well-formed error the client does not special-case.
    #[error("etcd error {code}: {message}")]
    Api {
        code: u32,
        message: String,
        cause: Option<String>,
    },

    /// The response body could not be understood.
    #[error("unexpected etcd response (HTTP {status}): {body}")]
    UnexpectedResponse { status: u16, body: String },

    /// The key holds a directory, not a value.
    #[error("etcd key {0} is a directory")]
    NotAValue(String),
}

/// Maps a non-success response onto a [`StoreError`].
///
/// `expected` is the version a conditional replace presented; it is `None`
/// for operations without a version precondition.
pub(crate) fn to_store_error(
    status: StatusCode,
    body: &str,
    key: &str,
    expected: Option<Version>,
) -> StoreError {
    let Ok(error) = serde_json::from_str::<ErrorBody>(body) else {
        return StoreError::Backend(Box::new(EtcdError::UnexpectedResponse {
            status: status.as_u16(),
            body: body.to_string(),
        }));
    };

    match (error.error_code, expected) {
        (ECODE_KEY_NOT_FOUND, _) => StoreError::NotFound {
            key: key.to_string(),
        },
        (ECODE_NODE_EXIST, _) => StoreError::AlreadyExists {
            key: key.to_string(),
        },
        (ECODE_TEST_FAILED, Some(expected)) => StoreError::VersionMismatch {
            key: key.to_string(),
            expected,
        },
        _ => StoreError::Backend(Box::new(EtcdError::Api {
            code: error.error_code,
            message: error.message,
            cause: error.cause,
        })),
    }
}
