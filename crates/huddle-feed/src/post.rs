//! Post record and patch types

use huddle_core::{PostId, Role, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Kind of media attached to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image attachment
    Image,
    /// Video attachment
    Video,
}

/// A feed post.
///
/// Invariant: `likes == liked_by.len()` after every store operation.
/// `skills` is capped at 5 entries by the composing screen, not by the
/// store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique post id
    pub id: PostId,
    /// Author's user id
    pub author_id: UserId,
    /// Author's display name at posting time
    pub author_name: String,
    /// Author's avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,
    /// Whether the author posted as athlete or coach
    pub author_role: Role,
    /// Post body; hashtags in the text feed the trending ranking
    pub content: String,
    /// Attached media URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    /// Kind of the attached media
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_kind: Option<MediaKind>,
    /// Sport this post relates to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    /// Skill labels, counted into trending alongside hashtags
    #[serde(default)]
    pub skills: Vec<String>,
    /// Like count, always derived from `liked_by`
    pub likes: usize,
    /// Comment count, maintained by the commenting collaborator
    pub comments: usize,
    /// Creation time
    pub created_at: Timestamp,
    /// Users who currently like this post
    #[serde(default)]
    pub liked_by: Vec<UserId>,
}

impl Post {
    /// Create a post with a fresh id, the current time, and no likes,
    /// comments, media, or skills.
    pub fn new(
        author_id: UserId,
        author_name: impl Into<String>,
        author_role: Role,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: PostId::new(),
            author_id,
            author_name: author_name.into(),
            author_avatar: None,
            author_role,
            content: content.into(),
            media_url: None,
            media_kind: None,
            sport: None,
            skills: Vec::new(),
            likes: 0,
            comments: 0,
            created_at: Timestamp::now(),
            liked_by: Vec::new(),
        }
    }

    /// Whether `user` currently likes this post.
    pub fn is_liked_by(&self, user: UserId) -> bool {
        self.liked_by.contains(&user)
    }

    /// Pure merge of a patch into this post. Fields the patch leaves as
    /// `None` are untouched.
    #[must_use]
    pub fn with_patch(mut self, patch: PostPatch) -> Self {
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(skills) = patch.skills {
            self.skills = skills;
        }
        if let Some(media_url) = patch.media_url {
            self.media_url = Some(media_url);
        }
        if let Some(media_kind) = patch.media_kind {
            self.media_kind = Some(media_kind);
        }
        if let Some(sport) = patch.sport {
            self.sport = Some(sport);
        }
        if let Some(comments) = patch.comments {
            self.comments = comments;
        }
        self
    }
}

/// The fields a collaborator may change on an existing post.
///
/// Like state is deliberately absent: it only moves through
/// `FeedState::toggle_like`, which keeps the count derived from the liker
/// set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostPatch {
    /// Replacement body text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Replacement skill labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    /// New media URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    /// New media kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_kind: Option<MediaKind>,
    /// New sport label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    /// New comment count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<usize>,
}
