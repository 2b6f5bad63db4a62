//! Notification State store
//!
//! In-memory log of notification entries with per-owner queries. After
//! every mutation the whole slice is serialized and the write handed to the
//! storage handler fire-and-forget; the in-memory log stays authoritative
//! for the session.

use huddle_core::{
    NotificationEffects, NotificationId, NotificationKind, StorageEffects, Timestamp, UserId,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::types::Notification;

/// Storage bucket key for the notification slice.
pub const NOTIFICATION_BUCKET: &str = "notification-state";

/// Persisted shape of the notification slice.
#[derive(Debug, Default, Serialize, Deserialize)]
struct NotificationSnapshot {
    notifications: Vec<Notification>,
}

#[derive(Default)]
struct Inner {
    notifications: Vec<Notification>,
    hydrated: bool,
}

/// Per-user notification log.
///
/// Construct once per session with a shared storage handler and pass by
/// `Arc`; all operations take `&self`.
pub struct NotificationState<S> {
    storage: Arc<S>,
    inner: RwLock<Inner>,
}

impl<S: StorageEffects + 'static> NotificationState<S> {
    /// Create an empty, not-yet-hydrated store.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Append a notification for `owner` with a fresh id and the current
    /// time, unread. Returns the new entry's id.
    pub fn enqueue(
        &self,
        owner: UserId,
        kind: NotificationKind,
        title: String,
        body: String,
        data: Option<serde_json::Value>,
    ) -> NotificationId {
        let notification = Notification {
            id: NotificationId::new(),
            owner,
            kind,
            title,
            body,
            data,
            timestamp: Timestamp::now(),
            read: false,
        };
        let id = notification.id;

        self.inner.write().notifications.push(notification);
        self.schedule_persist();
        id
    }

    /// Mark one entry read. No-op if the id is unknown.
    pub fn mark_read(&self, id: NotificationId) {
        let changed = {
            let mut inner = self.inner.write();
            match inner.notifications.iter_mut().find(|n| n.id == id) {
                Some(n) if !n.read => {
                    n.read = true;
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.schedule_persist();
        }
    }

    /// Mark every entry owned by `owner` read.
    pub fn mark_all_read(&self, owner: UserId) {
        let changed = {
            let mut inner = self.inner.write();
            let mut changed = false;
            for n in inner.notifications.iter_mut().filter(|n| n.owner == owner) {
                if !n.read {
                    n.read = true;
                    changed = true;
                }
            }
            changed
        };
        if changed {
            self.schedule_persist();
        }
    }

    /// Number of unread entries owned by `owner`.
    pub fn unread_count_for(&self, owner: UserId) -> usize {
        self.inner
            .read()
            .notifications
            .iter()
            .filter(|n| n.owner == owner && !n.read)
            .count()
    }

    /// All entries owned by `owner`, newest first.
    pub fn list_for(&self, owner: UserId) -> Vec<Notification> {
        let mut entries: Vec<Notification> = self
            .inner
            .read()
            .notifications
            .iter()
            .filter(|n| n.owner == owner)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    /// Remove every entry owned by `owner`.
    pub fn clear_for(&self, owner: UserId) {
        let changed = {
            let mut inner = self.inner.write();
            let before = inner.notifications.len();
            inner.notifications.retain(|n| n.owner != owner);
            inner.notifications.len() != before
        };
        if changed {
            self.schedule_persist();
        }
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
        let notifications = match self.storage.retrieve(NOTIFICATION_BUCKET).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<NotificationSnapshot>(&bytes) {
                Ok(snapshot) => snapshot.notifications,
                Err(err) => {
                    warn!(error = %err, "corrupt notification snapshot, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to load notification state");
                Vec::new()
            }
        };

        let mut inner = self.inner.write();
        inner.notifications = notifications;
        inner.hydrated = true;
    }

    /// Serialize and write the slice, awaiting the result.
    ///
    /// The mutation path persists fire-and-forget; this is for shutdown
    /// paths and tests that need the write on disk before proceeding.
    pub async fn persist(&self) -> huddle_core::Result<()> {
        let payload = {
            let inner = self.inner.read();
            serde_json::to_vec(&NotificationSnapshot {
                notifications: inner.notifications.clone(),
            })?
        };
        self.storage.store(NOTIFICATION_BUCKET, payload).await?;
        Ok(())
    }

    fn schedule_persist(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime, skipping notification persist");
            return;
        };
        let payload = {
            let inner = self.inner.read();
            match serde_json::to_vec(&NotificationSnapshot {
                notifications: inner.notifications.clone(),
            }) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!(error = %err, "failed to serialize notification state");
                    return;
                }
            }
        };
        let storage = Arc::clone(&self.storage);
        handle.spawn(async move {
            if let Err(err) = storage.store(NOTIFICATION_BUCKET, payload).await {
                warn!(error = %err, "failed to persist notification state");
            }
        });
    }
}

impl<S: StorageEffects + 'static> NotificationEffects for NotificationState<S> {
    fn enqueue(
        &self,
        owner: UserId,
        kind: NotificationKind,
        title: String,
        body: String,
        data: Option<serde_json::Value>,
    ) -> NotificationId {
        NotificationState::enqueue(self, owner, kind, title, body, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_effects::MemoryStorageHandler;

    fn store() -> NotificationState<MemoryStorageHandler> {
        NotificationState::new(Arc::new(MemoryStorageHandler::new()))
    }

    #[tokio::test]
    async fn test_enqueue_tracks_unread_per_owner() {
        let state = store();
        let alice = UserId::new();
        let bob = UserId::new();

        state.enqueue(
            alice,
            NotificationKind::Message,
            "New message from Bob".into(),
            "hey".into(),
            None,
        );
        state.enqueue(
            alice,
            NotificationKind::Like,
            "Bob liked your post".into(),
            String::new(),
            None,
        );

        assert_eq!(state.unread_count_for(alice), 2);
        assert_eq!(state.unread_count_for(bob), 0);
        assert_eq!(state.list_for(bob).len(), 0);
    }

    #[tokio::test]
    async fn test_mark_read_clears_single_entry() {
        let state = store();
        let alice = UserId::new();

        let id = state.enqueue(
            alice,
            NotificationKind::Message,
            "t".into(),
            "b".into(),
            None,
        );
        assert_eq!(state.unread_count_for(alice), 1);

        state.mark_read(id);
        assert_eq!(state.unread_count_for(alice), 0);

        // Unknown ids are ignored.
        state.mark_read(NotificationId::new());
        assert_eq!(state.unread_count_for(alice), 0);
    }

    #[tokio::test]
    async fn test_mark_all_read_scopes_to_owner() {
        let state = store();
        let alice = UserId::new();
        let bob = UserId::new();

        state.enqueue(
            alice,
            NotificationKind::Comment,
            "t".into(),
            "b".into(),
            None,
        );
        state.enqueue(bob, NotificationKind::Follow, "t".into(), "b".into(), None);

        state.mark_all_read(alice);
        assert_eq!(state.unread_count_for(alice), 0);
        assert_eq!(state.unread_count_for(bob), 1);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let state = store();
        let alice = UserId::new();

        state.enqueue(
            alice,
            NotificationKind::Message,
            "first".into(),
            "b".into(),
            None,
        );
        state.enqueue(
            alice,
            NotificationKind::Message,
            "second".into(),
            "b".into(),
            None,
        );

        let listed = state.list_for(alice);
        assert_eq!(listed.len(), 2);
        assert!(listed[0].timestamp >= listed[1].timestamp);
    }

    #[tokio::test]
    async fn test_clear_removes_only_owner_entries() {
        let state = store();
        let alice = UserId::new();
        let bob = UserId::new();

        state.enqueue(
            alice,
            NotificationKind::Message,
            "t".into(),
            "b".into(),
            None,
        );
        state.enqueue(bob, NotificationKind::Message, "t".into(), "b".into(), None);

        state.clear_for(alice);
        assert!(state.list_for(alice).is_empty());
        assert_eq!(state.list_for(bob).len(), 1);
    }

    #[tokio::test]
    async fn test_round_trip_through_storage() {
        let storage = Arc::new(MemoryStorageHandler::new());
        let state = NotificationState::new(Arc::clone(&storage));
        let alice = UserId::new();

        let id = state.enqueue(
            alice,
            NotificationKind::Message,
            "New message from Bob".into(),
            "hey".into(),
            Some(serde_json::json!({ "conversationId": "c1" })),
        );
        state.mark_read(id);
        state.persist().await.unwrap();

        let reloaded = NotificationState::new(storage);
        assert!(!reloaded.hydrated());
        reloaded.hydrate().await;
        assert!(reloaded.hydrated());

        let original = state.list_for(alice);
        let restored = reloaded.list_for(alice);
        assert_eq!(restored, original);
        assert_eq!(reloaded.unread_count_for(alice), 0);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_hydrates_empty() {
        let storage = Arc::new(MemoryStorageHandler::new());
        storage
            .store(NOTIFICATION_BUCKET, b"{not json".to_vec())
            .await
            .unwrap();

        let state = NotificationState::new(storage);
        state.hydrate().await;

        assert!(state.hydrated());
        assert_eq!(state.unread_count_for(UserId::new()), 0);
    }
}
