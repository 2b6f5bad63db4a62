//! Effect interfaces for the Huddle state core
//!
//! Traits defined here are implemented by higher layers and injected into
//! the stores by constructor, never reached through globals:
//!
//! - [`storage::StorageEffects`] — durable key/value persistence, implemented
//!   by `huddle-effects`
//! - [`notifications::NotificationEffects`] — the enqueue seam Messaging
//!   State fans out through, implemented by `huddle-notifications`

pub mod notifications;
pub mod storage;

pub use notifications::{NotificationEffects, NotificationKind};
pub use storage::{StorageEffects, StorageError};
