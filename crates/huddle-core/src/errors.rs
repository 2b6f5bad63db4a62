//! Unified error type for the Huddle state core
//!
//! The core is local state manipulation, so the taxonomy is narrow: storage
//! and serialization failures from the persistence path, not-found for the
//! few callers that ask for the distinction, and invalid/internal catch-alls.

use serde::{Deserialize, Serialize};

use crate::effects::storage::StorageError;

/// Result alias used across the Huddle crates.
pub type Result<T> = std::result::Result<T, HuddleError>;

/// Unified error type for Huddle operations.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum HuddleError {
    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Description of the invalid input
        message: String,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        /// Description of what was not found
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure
        message: String,
    },

    /// Storage operation failed
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure
        message: String,
    },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

impl HuddleError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<StorageError> for HuddleError {
    fn from(err: StorageError) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<serde_json::Error> for HuddleError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
