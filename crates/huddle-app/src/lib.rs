//! Huddle App - Portable headless application core
//!
//! One [`AppSession`] per process wires the four state stores (feed,
//! messaging, notifications, profile) over a single shared storage
//! handler and gates first render behind whole-app hydration. Frontends
//! import their state types from here and drive the stores through the
//! operations the session exposes; nothing in this crate renders anything.
//!
//! # Architecture
//!
//! The session owns the only cross-store wiring in the system: Messaging
//! State receives Notification State as its `NotificationEffects` sink at
//! construction. Stores are reached through explicit accessors, never
//! through globals.

pub mod profile;
pub mod session;

pub use huddle_core::{
    ConversationId, HuddleError, MessageId, NotificationId, NotificationKind, PostId, Role,
    Timestamp, UserId,
};
pub use huddle_feed::{Comment, CommentsState, FeedState, MediaKind, Post, PostPatch, TagCount};
pub use huddle_messaging::{Conversation, Message, MessagingState};
pub use huddle_notifications::{Notification, NotificationState};
pub use profile::{ProfilePatch, ProfileState, UserProfile, PROFILE_BUCKET};
pub use session::AppSession;
