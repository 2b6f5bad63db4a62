//! Notification entry type

use huddle_core::{NotificationId, NotificationKind, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A single notification entry.
///
/// Created by an event-producing store (messaging, or in principle any
/// other producer), mutated only by read-marking, removed only by a
/// per-user clear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique entry id
    pub id: NotificationId,
    /// The user who should see this notification
    pub owner: UserId,
    /// What kind of event this describes
    pub kind: NotificationKind,
    /// Short headline, e.g. "New message from Alice"
    pub title: String,
    /// Full body text
    pub body: String,
    /// Opaque payload for the UI (e.g. conversation/message ids)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// When the notification was enqueued
    pub timestamp: Timestamp,
    /// Whether the owner has seen it
    pub read: bool,
}
