//! Messaging State store
//!
//! Conversation metadata plus the append-only message log. Sending a
//! message updates the owning conversation's unread bookkeeping and fans
//! out one notification per non-sender participant through the injected
//! sink. The conversation update and the notification enqueue are two
//! separate mutations with independently scheduled writes; a crash between
//! them can persist one without the other (best-effort, single replica).

use huddle_core::{
    ConversationId, MessageId, NotificationEffects, NotificationKind, StorageEffects, Timestamp,
    UserId,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::types::{Conversation, Message};

/// Storage bucket key for the messaging slice.
pub const MESSAGING_BUCKET: &str = "messaging-state";

/// Persisted shape of the messaging slice.
#[derive(Debug, Default, Serialize, Deserialize)]
struct MessagingSnapshot {
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
}

#[derive(Default)]
struct Inner {
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    hydrated: bool,
}

/// Conversation and message store.
///
/// `S` is the storage handler; `N` is the notification sink messaging
/// fans out through. Both are injected at construction and shared by
/// `Arc`.
pub struct MessagingState<S, N> {
    storage: Arc<S>,
    notifications: Arc<N>,
    inner: RwLock<Inner>,
}

impl<S, N> MessagingState<S, N>
where
    S: StorageEffects + 'static,
    N: NotificationEffects,
{
    /// Create an empty, not-yet-hydrated store.
    pub fn new(storage: Arc<S>, notifications: Arc<N>) -> Self {
        Self {
            storage,
            notifications,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Find the conversation between `a` and `b` (either order), creating
    /// it if none exists. Returns the conversation id; calling with the
    /// arguments swapped returns the same id.
    pub fn get_or_create_conversation(
        &self,
        a: UserId,
        a_name: &str,
        b: UserId,
        b_name: &str,
    ) -> ConversationId {
        {
            let inner = self.inner.read();
            if let Some(existing) = inner.conversations.iter().find(|c| c.involves_pair(a, b)) {
                return existing.id;
            }
        }

        let conversation = Conversation {
            id: ConversationId::new(),
            participants: vec![a, b],
            participant_names: vec![a_name.to_string(), b_name.to_string()],
            last_message: None,
            last_message_time: Timestamp::now(),
            unread_count: 0,
            unread_by: Vec::new(),
        };
        let id = conversation.id;

        self.inner.write().conversations.push(conversation);
        self.schedule_persist();
        id
    }

    /// Append a message to `conversation_id` and update the thread:
    /// last-message snapshot, unread set (everyone but the sender), and
    /// the unread counter (unchanged if the sender was itself counted as
    /// unread, incremented otherwise). Fans out one `message` notification
    /// per non-sender participant. No-op if the conversation is absent.
    pub fn send_message(
        &self,
        conversation_id: ConversationId,
        sender: UserId,
        sender_name: &str,
        content: &str,
    ) {
        let sent = {
            let mut inner = self.inner.write();
            let Some(conv) = inner
                .conversations
                .iter_mut()
                .find(|c| c.id == conversation_id)
            else {
                return;
            };

            let message = Message {
                id: MessageId::new(),
                conversation_id,
                sender_id: sender,
                sender_name: sender_name.to_string(),
                content: content.to_string(),
                timestamp: Timestamp::now(),
                read: false,
            };

            conv.last_message = Some(message.clone());
            conv.last_message_time = message.timestamp;
            if !conv.unread_by.contains(&sender) {
                conv.unread_count += 1;
            }
            conv.unread_by = conv
                .participants
                .iter()
                .copied()
                .filter(|id| *id != sender)
                .collect();
            let recipients = conv.unread_by.clone();

            inner.messages.push(message.clone());
            (recipients, message)
        };
        self.schedule_persist();

        let (recipients, message) = sent;
        for recipient in recipients {
            self.notifications.enqueue(
                recipient,
                NotificationKind::Message,
                format!("New message from {}", message.sender_name),
                message.content.clone(),
                Some(serde_json::json!({
                    "conversation_id": message.conversation_id,
                    "message_id": message.id,
                })),
            );
        }
    }

    /// Record that `user` has seen the latest content: remove them from
    /// the unread set and decrement the counter, clamped at zero. No-op if
    /// the conversation is absent or the user was not marked unread.
    pub fn mark_conversation_read(&self, conversation_id: ConversationId, user: UserId) {
        let changed = {
            let mut inner = self.inner.write();
            match inner
                .conversations
                .iter_mut()
                .find(|c| c.id == conversation_id)
            {
                Some(conv) if conv.unread_by.contains(&user) => {
                    conv.unread_by.retain(|u| *u != user);
                    conv.unread_count = conv.unread_count.saturating_sub(1);
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.schedule_persist();
        }
    }

    /// Look up a conversation by id.
    pub fn conversation(&self, id: ConversationId) -> Option<Conversation> {
        self.inner
            .read()
            .conversations
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// Messages in `conversation_id`, ascending by timestamp.
    pub fn messages(&self, conversation_id: ConversationId) -> Vec<Message> {
        let mut messages: Vec<Message> = self
            .inner
            .read()
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        messages
    }

    /// Conversations `user` participates in, most recently active first.
    pub fn conversations_for_user(&self, user: UserId) -> Vec<Conversation> {
        let mut conversations: Vec<Conversation> = self
            .inner
            .read()
            .conversations
            .iter()
            .filter(|c| c.includes(user))
            .cloned()
            .collect();
        conversations.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
        conversations
    }

    /// Whether hydration has completed.
    pub fn hydrated(&self) -> bool {
        self.inner.read().hydrated
    }

    /// Load the persisted slice, replacing in-memory state.
    ///
    /// Missing or corrupt data leaves the store empty; either way the store
    /// is marked hydrated afterwards.
    pub async fn hydrate(&self) {
        let snapshot = match self.storage.retrieve(MESSAGING_BUCKET).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<MessagingSnapshot>(&bytes) {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    warn!(error = %err, "corrupt messaging snapshot, starting empty");
                    MessagingSnapshot::default()
                }
            },
            Ok(None) => MessagingSnapshot::default(),
            Err(err) => {
                warn!(error = %err, "failed to load messaging state");
                MessagingSnapshot::default()
            }
        };

        let mut inner = self.inner.write();
        inner.conversations = snapshot.conversations;
        inner.messages = snapshot.messages;
        inner.hydrated = true;
    }

    /// Serialize and write the slice, awaiting the result.
    pub async fn persist(&self) -> huddle_core::Result<()> {
        let payload = {
            let inner = self.inner.read();
            serde_json::to_vec(&MessagingSnapshot {
                conversations: inner.conversations.clone(),
                messages: inner.messages.clone(),
            })?
        };
        self.storage.store(MESSAGING_BUCKET, payload).await?;
        Ok(())
    }

    fn schedule_persist(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime, skipping messaging persist");
            return;
        };
        let payload = {
            let inner = self.inner.read();
            match serde_json::to_vec(&MessagingSnapshot {
                conversations: inner.conversations.clone(),
                messages: inner.messages.clone(),
            }) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!(error = %err, "failed to serialize messaging state");
                    return;
                }
            }
        };
        let storage = Arc::clone(&self.storage);
        handle.spawn(async move {
            if let Err(err) = storage.store(MESSAGING_BUCKET, payload).await {
                warn!(error = %err, "failed to persist messaging state");
            }
        });
    }
}
