//! Notification effect interface
//!
//! Messaging State must enqueue a notification for the recipient of every
//! message it appends. That cross-store side effect goes through this trait
//! so the messaging crate never depends on the notification store directly;
//! `NotificationState` in `huddle-notifications` is the implementation and
//! is injected at session construction.

use serde::{Deserialize, Serialize};

use crate::identifiers::{NotificationId, UserId};

/// The kind of event a notification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// A direct message was received
    Message,
    /// A post was liked
    Like,
    /// A post was commented on
    Comment,
    /// A user started following the owner
    Follow,
}

impl NotificationKind {
    /// Lowercase label for logging and persisted records
    pub fn label(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Follow => "follow",
        }
    }
}

/// Sink for notification events produced by other stores.
///
/// Enqueueing is a synchronous in-memory mutation; the implementation
/// persists its own slice on its own schedule.
pub trait NotificationEffects: Send + Sync {
    /// Append a notification for `owner`, returning the new entry's id.
    fn enqueue(
        &self,
        owner: UserId,
        kind: NotificationKind,
        title: String,
        body: String,
        data: Option<serde_json::Value>,
    ) -> NotificationId;
}
