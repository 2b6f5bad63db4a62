//! Storage effect interface
//!
//! The persistence adapter contract: an asynchronous key/value store of
//! serialized JSON blobs, keyed by bucket name. Each store persists its
//! whole slice under one key and rehydrates it at process start. Handlers
//! live in `huddle-effects`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for storage operations.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum StorageError {
    /// The key is not acceptable to the backend
    #[error("invalid key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },
    /// A read against the backend failed
    #[error("read failed: {0}")]
    ReadFailed(String),
    /// A write against the backend failed
    #[error("write failed: {0}")]
    WriteFailed(String),
    /// A delete against the backend failed
    #[error("delete failed: {0}")]
    DeleteFailed(String),
}

/// Durable key/value storage for serialized store snapshots.
///
/// Writes are last-write-wins per key; there is no transaction spanning
/// keys. Callers treat the in-memory state as authoritative and use this
/// interface only to survive process restarts.
#[async_trait]
pub trait StorageEffects: Send + Sync {
    /// Persist `value` under `key`, replacing any previous value.
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Fetch the value stored under `key`, or `None` if absent.
    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Delete the value under `key`. Returns whether a value was present.
    async fn remove(&self, key: &str) -> Result<bool, StorageError>;

    /// Whether a value exists under `key`.
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;
}
