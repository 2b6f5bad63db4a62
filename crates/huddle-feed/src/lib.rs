//! Huddle Feed - Post collection, likes, comments, trending tags
//!
//! [`FeedState`] owns the post collection: creation, patch-merge updates,
//! deletion, idempotent like toggling, and trending-tag ranking over
//! hashtags and skill labels. [`CommentsState`] is the companion in-memory
//! comment log; comment counts on posts are maintained by the producing
//! collaborator through [`PostPatch`], matching how the rest of the UI
//! drives this store.

pub mod comments;
pub mod post;
pub mod state;
pub mod trending;

pub use comments::{Comment, CommentsState};
pub use huddle_core::Role;
pub use post::{MediaKind, Post, PostPatch};
pub use state::{FeedState, FEED_BUCKET};
pub use trending::{TagCount, TRENDING_LIMIT};
