//! Feed State store
//!
//! Most-recent-first post collection with like toggling and trending-tag
//! queries. Mutations are synchronous; after each one the slice is
//! serialized and the write handed to the storage handler fire-and-forget.

use huddle_core::{PostId, StorageEffects, UserId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::post::{Post, PostPatch};
use crate::trending::{self, TagCount};

/// Storage bucket key for the feed slice.
pub const FEED_BUCKET: &str = "feed-state";

/// Persisted shape of the feed slice.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FeedSnapshot {
    posts: Vec<Post>,
}

#[derive(Default)]
struct Inner {
    posts: Vec<Post>,
    hydrated: bool,
}

/// Post collection store.
///
/// Construct once per session with a shared storage handler and pass by
/// `Arc`; all operations take `&self`. Queries are safe before hydration
/// and return empty results.
pub struct FeedState<S> {
    storage: Arc<S>,
    inner: RwLock<Inner>,
}

impl<S: StorageEffects + 'static> FeedState<S> {
    /// Create an empty, not-yet-hydrated store.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Insert a post at the head of the collection.
    ///
    /// Id uniqueness is the caller's responsibility.
    pub fn add_post(&self, post: Post) {
        self.inner.write().posts.insert(0, post);
        self.schedule_persist();
    }

    /// Replace the whole collection (seeding path).
    pub fn set_posts(&self, posts: Vec<Post>) {
        self.inner.write().posts = posts;
        self.schedule_persist();
    }

    /// Merge a patch into the post with `id`. No-op if absent.
    pub fn update_post(&self, id: PostId, patch: PostPatch) {
        let changed = {
            let mut inner = self.inner.write();
            match inner.posts.iter_mut().find(|p| p.id == id) {
                Some(post) => {
                    *post = post.clone().with_patch(patch);
                    true
                }
                None => false,
            }
        };
        if changed {
            self.schedule_persist();
        }
    }

    /// Remove the post with `id`. No-op if absent.
    pub fn delete_post(&self, id: PostId) {
        let changed = {
            let mut inner = self.inner.write();
            let before = inner.posts.len();
            inner.posts.retain(|p| p.id != id);
            inner.posts.len() != before
        };
        if changed {
            self.schedule_persist();
        }
    }

    /// Toggle `user`'s like on the post: remove it if present, add it
    /// otherwise, and recompute the count from the liker set. Applying
    /// twice in a row restores the original state. No-op if the post is
    /// absent.
    pub fn toggle_like(&self, post_id: PostId, user: UserId) {
        let changed = {
            let mut inner = self.inner.write();
            match inner.posts.iter_mut().find(|p| p.id == post_id) {
                Some(post) => {
                    if post.liked_by.contains(&user) {
                        post.liked_by.retain(|u| *u != user);
                    } else {
                        post.liked_by.push(user);
                    }
                    post.likes = post.liked_by.len();
                    true
                }
                None => false,
            }
        };
        if changed {
            self.schedule_persist();
        }
    }

    /// Whether `user` currently likes the post. False if the post is
    /// absent.
    pub fn is_liked_by_user(&self, post_id: PostId, user: UserId) -> bool {
        self.inner
            .read()
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .is_some_and(|p| p.is_liked_by(user))
    }

    /// Look up a post by id.
    pub fn post(&self, post_id: PostId) -> Option<Post> {
        self.inner
            .read()
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .cloned()
    }

    /// The whole collection, most recent first.
    pub fn posts(&self) -> Vec<Post> {
        self.inner.read().posts.clone()
    }

    /// Rank hashtags and skill labels across all posts.
    pub fn trending_tags(&self) -> Vec<TagCount> {
        trending::trending_tags(&self.inner.read().posts)
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
        let posts = match self.storage.retrieve(FEED_BUCKET).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<FeedSnapshot>(&bytes) {
                Ok(snapshot) => snapshot.posts,
                Err(err) => {
                    warn!(error = %err, "corrupt feed snapshot, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to load feed state");
                Vec::new()
            }
        };

        let mut inner = self.inner.write();
        inner.posts = posts;
        inner.hydrated = true;
    }

    /// Serialize and write the slice, awaiting the result.
    pub async fn persist(&self) -> huddle_core::Result<()> {
        let payload = {
            let inner = self.inner.read();
            serde_json::to_vec(&FeedSnapshot {
                posts: inner.posts.clone(),
            })?
        };
        self.storage.store(FEED_BUCKET, payload).await?;
        Ok(())
    }

    fn schedule_persist(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime, skipping feed persist");
            return;
        };
        let payload = {
            let inner = self.inner.read();
            match serde_json::to_vec(&FeedSnapshot {
                posts: inner.posts.clone(),
            }) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!(error = %err, "failed to serialize feed state");
                    return;
                }
            }
        };
        let storage = Arc::clone(&self.storage);
        handle.spawn(async move {
            if let Err(err) = storage.store(FEED_BUCKET, payload).await {
                warn!(error = %err, "failed to persist feed state");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_core::Role;
    use huddle_effects::MemoryStorageHandler;
    use proptest::prelude::*;

    fn store() -> FeedState<MemoryStorageHandler> {
        FeedState::new(Arc::new(MemoryStorageHandler::new()))
    }

    #[tokio::test]
    async fn test_add_post_inserts_at_head() {
        let state = store();
        let first = Post::new(UserId::new(), "Alice", Role::Athlete, "first");
        let second = Post::new(UserId::new(), "Bob", Role::Coach, "second");

        state.add_post(first.clone());
        state.add_post(second.clone());

        let posts = state.posts();
        assert_eq!(posts[0].id, second.id);
        assert_eq!(posts[1].id, first.id);
    }

    #[tokio::test]
    async fn test_toggle_like_is_idempotent_under_double_invocation() {
        let state = store();
        let post = Post::new(UserId::new(), "Alice", Role::Athlete, "post");
        let id = post.id;
        let fan = UserId::new();
        state.add_post(post);

        let before = state.post(id).unwrap();

        state.toggle_like(id, fan);
        let liked = state.post(id).unwrap();
        assert!(liked.is_liked_by(fan));
        assert_eq!(liked.likes, liked.liked_by.len());
        assert_eq!(liked.likes, 1);
        assert!(state.is_liked_by_user(id, fan));

        state.toggle_like(id, fan);
        let after = state.post(id).unwrap();
        assert_eq!(after.liked_by, before.liked_by);
        assert_eq!(after.likes, before.likes);
        assert!(!state.is_liked_by_user(id, fan));
    }

    #[tokio::test]
    async fn test_toggle_like_on_missing_post_is_noop() {
        let state = store();
        state.toggle_like(PostId::new(), UserId::new());
        assert!(state.posts().is_empty());
        assert!(!state.is_liked_by_user(PostId::new(), UserId::new()));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let state = store();
        let post = Post::new(UserId::new(), "Alice", Role::Athlete, "before");
        let id = post.id;
        state.add_post(post);

        state.update_post(
            id,
            PostPatch {
                content: Some("after".into()),
                comments: Some(2),
                ..PostPatch::default()
            },
        );
        let updated = state.post(id).unwrap();
        assert_eq!(updated.content, "after");
        assert_eq!(updated.comments, 2);

        // Unknown ids are ignored.
        state.update_post(PostId::new(), PostPatch::default());

        state.delete_post(id);
        assert!(state.post(id).is_none());
        state.delete_post(id);
        assert!(state.posts().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_through_storage() {
        let storage = Arc::new(MemoryStorageHandler::new());
        let state = FeedState::new(Arc::clone(&storage));

        let mut post = Post::new(UserId::new(), "Alice", Role::Athlete, "hello #feed");
        post.skills = vec!["Dribbling".into()];
        let id = post.id;
        let fan = UserId::new();
        state.add_post(post);
        state.toggle_like(id, fan);
        state.persist().await.unwrap();

        let reloaded = FeedState::new(storage);
        reloaded.hydrate().await;

        assert_eq!(reloaded.posts(), state.posts());
        let restored = reloaded.post(id).unwrap();
        assert_eq!(
            restored.created_at,
            state.post(id).unwrap().created_at,
            "timestamps must compare equal after rehydration"
        );
        assert!(reloaded.is_liked_by_user(id, fan));
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_hydrates_empty() {
        let storage = Arc::new(MemoryStorageHandler::new());
        storage
            .store(FEED_BUCKET, b"[not a snapshot]".to_vec())
            .await
            .unwrap();

        let state = FeedState::new(storage);
        assert!(state.posts().is_empty(), "pre-hydration reads are empty");
        state.hydrate().await;

        assert!(state.hydrated());
        assert!(state.posts().is_empty());
    }

    proptest! {
        #[test]
        fn test_double_toggle_restores_any_liker_set(likers in prop::collection::vec(any::<u128>(), 0..6)) {
            let state = store();
            let mut post = Post::new(UserId::new(), "Alice", Role::Athlete, "p");
            let id = post.id;
            post.liked_by = likers
                .iter()
                .map(|raw| UserId::from_uuid(uuid::Uuid::from_u128(*raw)))
                .collect();
            post.liked_by.dedup();
            post.likes = post.liked_by.len();
            state.add_post(post);

            let toggler = UserId::new();
            let before = state.post(id).unwrap();
            state.toggle_like(id, toggler);
            state.toggle_like(id, toggler);
            let after = state.post(id).unwrap();

            prop_assert_eq!(after.liked_by, before.liked_by);
            prop_assert_eq!(after.likes, before.likes);
        }
    }
}
