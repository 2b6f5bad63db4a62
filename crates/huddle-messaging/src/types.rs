//! Conversation and message types

use huddle_core::{ConversationId, MessageId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A thread between exactly two participants.
///
/// Participant order carries no meaning; lookup is by set membership, and
/// at most one conversation exists per unordered participant pair.
/// `participant_names` is parallel to `participants`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation id
    pub id: ConversationId,
    /// The two participant ids
    pub participants: Vec<UserId>,
    /// Display names, parallel to `participants`
    pub participant_names: Vec<String>,
    /// Snapshot of the most recent message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<Message>,
    /// Time of the most recent message (creation time until one is sent)
    pub last_message_time: Timestamp,
    /// Outstanding unread events for this thread
    pub unread_count: u32,
    /// Participants who have not seen the latest content
    #[serde(default)]
    pub unread_by: Vec<UserId>,
}

impl Conversation {
    /// Whether `user` is a participant.
    pub fn includes(&self, user: UserId) -> bool {
        self.participants.contains(&user)
    }

    /// Whether this thread is between `a` and `b`, in either order.
    pub fn involves_pair(&self, a: UserId, b: UserId) -> bool {
        self.includes(a) && self.includes(b)
    }
}

/// A message within a conversation. Append-only: immutable once created.
///
/// The `read` flag is informational; the unread state that drives badges
/// lives on the owning [`Conversation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message id
    pub id: MessageId,
    /// Owning conversation
    pub conversation_id: ConversationId,
    /// Sender's user id
    pub sender_id: UserId,
    /// Sender's display name at send time
    pub sender_name: String,
    /// Message text
    pub content: String,
    /// Send time; messages order ascending by this
    pub timestamp: Timestamp,
    /// Informational read flag
    pub read: bool,
}
