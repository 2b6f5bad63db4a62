//! In-memory comment log
//!
//! Comments are append-only and session-local; they are not persisted.
//! The comment count shown on a post is maintained by the commenting
//! screen through `PostPatch`, so this log and the feed store stay
//! decoupled.

use huddle_core::{CommentId, PostId, Timestamp, UserId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A comment on a feed post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment id
    pub id: CommentId,
    /// Post this comment belongs to
    pub post_id: PostId,
    /// Commenting user
    pub author_id: UserId,
    /// Commenting user's display name
    pub author_name: String,
    /// Commenting user's avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,
    /// Comment text
    pub content: String,
    /// When the comment was made
    pub created_at: Timestamp,
}

impl Comment {
    /// Create a comment with a fresh id and the current time.
    pub fn new(
        post_id: PostId,
        author_id: UserId,
        author_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: CommentId::new(),
            post_id,
            author_id,
            author_name: author_name.into(),
            author_avatar: None,
            content: content.into(),
            created_at: Timestamp::now(),
        }
    }
}

/// Append-only comment log, queried per post.
#[derive(Default)]
pub struct CommentsState {
    comments: RwLock<Vec<Comment>>,
}

impl CommentsState {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a comment.
    pub fn add_comment(&self, comment: Comment) {
        self.comments.write().push(comment);
    }

    /// All comments on `post_id`, in insertion order.
    pub fn comments_for_post(&self, post_id: PostId) -> Vec<Comment> {
        self.comments
            .read()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect()
    }
}
