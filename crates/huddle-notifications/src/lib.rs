//! Huddle Notifications - Per-user notification log
//!
//! [`NotificationState`] owns the notification entries for every local
//! user: enqueue, read-marking, unread counts, and per-user clearing. It
//! implements `huddle_core::NotificationEffects`, which is how Messaging
//! State fans message events out to recipients without depending on this
//! crate directly.
//!
//! This store never calls into any other store.

pub mod state;
pub mod types;

pub use state::{NotificationState, NOTIFICATION_BUCKET};
pub use types::Notification;
