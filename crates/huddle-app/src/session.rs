//! Application session: store wiring and the hydration gate
//!
//! One `AppSession` is constructed at startup with the storage handler for
//! this replica and passed explicitly to whatever drives the UI. The
//! session is the only place stores learn about each other.

use huddle_core::StorageEffects;
use huddle_feed::{CommentsState, FeedState};
use huddle_messaging::MessagingState;
use huddle_notifications::NotificationState;
use std::sync::Arc;

use crate::profile::ProfileState;

/// The wired set of stores for one local replica.
///
/// Consumers must await [`AppSession::hydrate`] before rendering derived
/// values (unread counts, conversation lists); until then queries return
/// empty results and [`AppSession::is_hydrated`] is false.
pub struct AppSession<S> {
    feed: Arc<FeedState<S>>,
    comments: Arc<CommentsState>,
    notifications: Arc<NotificationState<S>>,
    messaging: Arc<MessagingState<S, NotificationState<S>>>,
    profile: Arc<ProfileState<S>>,
}

impl<S: StorageEffects + 'static> AppSession<S> {
    /// Wire the stores over a shared storage handler.
    pub fn new(storage: Arc<S>) -> Self {
        let notifications = Arc::new(NotificationState::new(Arc::clone(&storage)));
        let messaging = Arc::new(MessagingState::new(
            Arc::clone(&storage),
            Arc::clone(&notifications),
        ));
        let feed = Arc::new(FeedState::new(Arc::clone(&storage)));
        let profile = Arc::new(ProfileState::new(storage));

        Self {
            feed,
            comments: Arc::new(CommentsState::new()),
            notifications,
            messaging,
            profile,
        }
    }

    /// The feed store.
    pub fn feed(&self) -> Arc<FeedState<S>> {
        Arc::clone(&self.feed)
    }

    /// The session-local comment log.
    pub fn comments(&self) -> Arc<CommentsState> {
        Arc::clone(&self.comments)
    }

    /// The notification store.
    pub fn notifications(&self) -> Arc<NotificationState<S>> {
        Arc::clone(&self.notifications)
    }

    /// The messaging store.
    pub fn messaging(&self) -> Arc<MessagingState<S, NotificationState<S>>> {
        Arc::clone(&self.messaging)
    }

    /// The profile store.
    pub fn profile(&self) -> Arc<ProfileState<S>> {
        Arc::clone(&self.profile)
    }

    /// Load every persisted slice. Resolves once all stores are hydrated.
    pub async fn hydrate(&self) {
        tokio::join!(
            self.feed.hydrate(),
            self.notifications.hydrate(),
            self.messaging.hydrate(),
            self.profile.hydrate(),
        );
    }

    /// Whether every store has finished hydrating.
    pub fn is_hydrated(&self) -> bool {
        self.feed.hydrated()
            && self.notifications.hydrated()
            && self.messaging.hydrated()
            && self.profile.hydrated()
    }

    /// Write every slice, awaiting the results. Shutdown path; the
    /// mutation path persists on its own fire-and-forget schedule.
    pub async fn persist_all(&self) -> huddle_core::Result<()> {
        self.feed.persist().await?;
        self.notifications.persist().await?;
        self.messaging.persist().await?;
        self.profile.persist().await?;
        Ok(())
    }
}
