//! Huddle Messaging - Conversations and messages
//!
//! [`MessagingState`] owns conversation metadata and the append-only
//! message log: lookup/creation with unordered-pair deduplication, message
//! send with unread bookkeeping, and read marking. Sending a message fans
//! out to the recipient through the injected
//! `huddle_core::NotificationEffects` sink; that is this store's only
//! cross-store edge.

pub mod state;
pub mod types;

pub use state::{MessagingState, MESSAGING_BUCKET};
pub use types::{Conversation, Message};
