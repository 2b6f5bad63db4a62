//! Profile slice: the single local user record plus the known-user
//! directory that backs people search.
//!
//! There is no authentication here; the record simply identifies who is
//! using this replica and what the people-search screen can find.

use huddle_core::{Role, StorageEffects, UserId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Storage bucket key for the profile slice.
pub const PROFILE_BUCKET: &str = "profile-state";

/// A user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user id
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Athlete or coach
    pub role: Role,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Short bio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Home location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Primary sport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    /// Playing position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Listed achievements
    #[serde(default)]
    pub achievements: Vec<String>,
    /// Experience summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    /// Team or club affiliation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_affiliation: Option<String>,
}

impl UserProfile {
    /// Create a minimal record; optional fields start empty.
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            role,
            avatar: None,
            bio: None,
            location: None,
            sport: None,
            position: None,
            achievements: Vec::new(),
            experience: None,
            team_affiliation: None,
        }
    }

    /// Pure merge of a patch into this record.
    #[must_use]
    pub fn with_patch(mut self, patch: ProfilePatch) -> Self {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar);
        }
        if let Some(bio) = patch.bio {
            self.bio = Some(bio);
        }
        if let Some(location) = patch.location {
            self.location = Some(location);
        }
        if let Some(sport) = patch.sport {
            self.sport = Some(sport);
        }
        if let Some(position) = patch.position {
            self.position = Some(position);
        }
        if let Some(achievements) = patch.achievements {
            self.achievements = achievements;
        }
        if let Some(experience) = patch.experience {
            self.experience = Some(experience);
        }
        if let Some(team_affiliation) = patch.team_affiliation {
            self.team_affiliation = Some(team_affiliation);
        }
        self
    }
}

/// The fields profile editing may change. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    /// New display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// New bio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// New location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// New sport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    /// New position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Replacement achievements list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievements: Option<Vec<String>>,
    /// New experience summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    /// New team affiliation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_affiliation: Option<String>,
}

/// Persisted shape of the profile slice.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfileSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<UserProfile>,
    #[serde(default)]
    onboarded: bool,
    #[serde(default)]
    known_users: Vec<UserProfile>,
}

#[derive(Default)]
struct Inner {
    user: Option<UserProfile>,
    onboarded: bool,
    known_users: Vec<UserProfile>,
    hydrated: bool,
}

/// Local user record and people directory.
pub struct ProfileState<S> {
    storage: Arc<S>,
    inner: RwLock<Inner>,
}

impl<S: StorageEffects + 'static> ProfileState<S> {
    /// Create an empty, not-yet-hydrated store.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Set the local user record.
    pub fn set_user(&self, profile: UserProfile) {
        self.inner.write().user = Some(profile);
        self.schedule_persist();
    }

    /// Merge a patch into the local record, mirroring the change into the
    /// directory entry with the same id. No-op if no local user is set.
    pub fn update_profile(&self, patch: ProfilePatch) {
        let changed = {
            let mut inner = self.inner.write();
            match inner.user.take() {
                Some(user) => {
                    let updated = user.with_patch(patch);
                    if let Some(entry) = inner.known_users.iter_mut().find(|u| u.id == updated.id)
                    {
                        *entry = updated.clone();
                    }
                    inner.user = Some(updated);
                    true
                }
                None => false,
            }
        };
        if changed {
            self.schedule_persist();
        }
    }

    /// Clear the local record.
    pub fn sign_out(&self) {
        let mut inner = self.inner.write();
        inner.user = None;
        inner.onboarded = false;
        drop(inner);
        self.schedule_persist();
    }

    /// Mark onboarding as finished.
    pub fn complete_onboarding(&self) {
        self.inner.write().onboarded = true;
        self.schedule_persist();
    }

    /// Add or replace a directory entry, matched by id.
    pub fn upsert_known_user(&self, profile: UserProfile) {
        {
            let mut inner = self.inner.write();
            match inner.known_users.iter_mut().find(|u| u.id == profile.id) {
                Some(entry) => *entry = profile,
                None => inner.known_users.push(profile),
            }
        }
        self.schedule_persist();
    }

    /// Case-insensitive substring search over name, email, role, sport,
    /// and location. An empty or whitespace query matches nothing.
    pub fn search_users(&self, query: &str) -> Vec<UserProfile> {
        let term = query.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        self.inner
            .read()
            .known_users
            .iter()
            .filter(|u| {
                u.name.to_lowercase().contains(&term)
                    || u.email.to_lowercase().contains(&term)
                    || u.role.label().contains(&term)
                    || u.sport
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(&term))
                    || u.location
                        .as_deref()
                        .is_some_and(|l| l.to_lowercase().contains(&term))
            })
            .cloned()
            .collect()
    }

    /// The local user record, if one is set.
    pub fn user(&self) -> Option<UserProfile> {
        self.inner.read().user.clone()
    }

    /// Whether onboarding has finished.
    pub fn is_onboarded(&self) -> bool {
        self.inner.read().onboarded
    }

    /// All directory entries.
    pub fn known_users(&self) -> Vec<UserProfile> {
        self.inner.read().known_users.clone()
    }

    /// Whether hydration has completed.
    pub fn hydrated(&self) -> bool {
        self.inner.read().hydrated
    }

    /// Load the persisted slice, replacing in-memory state.
    pub async fn hydrate(&self) {
        let snapshot = match self.storage.retrieve(PROFILE_BUCKET).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<ProfileSnapshot>(&bytes) {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    warn!(error = %err, "corrupt profile snapshot, starting empty");
                    ProfileSnapshot::default()
                }
            },
            Ok(None) => ProfileSnapshot::default(),
            Err(err) => {
                warn!(error = %err, "failed to load profile state");
                ProfileSnapshot::default()
            }
        };

        let mut inner = self.inner.write();
        inner.user = snapshot.user;
        inner.onboarded = snapshot.onboarded;
        inner.known_users = snapshot.known_users;
        inner.hydrated = true;
    }

    /// Serialize and write the slice, awaiting the result.
    pub async fn persist(&self) -> huddle_core::Result<()> {
        let payload = {
            let inner = self.inner.read();
            serde_json::to_vec(&ProfileSnapshot {
                user: inner.user.clone(),
                onboarded: inner.onboarded,
                known_users: inner.known_users.clone(),
            })?
        };
        self.storage.store(PROFILE_BUCKET, payload).await?;
        Ok(())
    }

    fn schedule_persist(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime, skipping profile persist");
            return;
        };
        let payload = {
            let inner = self.inner.read();
            match serde_json::to_vec(&ProfileSnapshot {
                user: inner.user.clone(),
                onboarded: inner.onboarded,
                known_users: inner.known_users.clone(),
            }) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!(error = %err, "failed to serialize profile state");
                    return;
                }
            }
        };
        let storage = Arc::clone(&self.storage);
        handle.spawn(async move {
            if let Err(err) = storage.store(PROFILE_BUCKET, payload).await {
                warn!(error = %err, "failed to persist profile state");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_effects::MemoryStorageHandler;

    fn store() -> ProfileState<MemoryStorageHandler> {
        ProfileState::new(Arc::new(MemoryStorageHandler::new()))
    }

    #[tokio::test]
    async fn test_update_profile_merges_and_mirrors_directory() {
        let state = store();
        let user = UserProfile::new("Alice", "alice@example.com", Role::Athlete);
        let id = user.id;
        state.set_user(user.clone());
        state.upsert_known_user(user);

        state.update_profile(ProfilePatch {
            bio: Some("Mid-distance runner".into()),
            sport: Some("Track".into()),
            ..ProfilePatch::default()
        });

        let updated = state.user().unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.bio.as_deref(), Some("Mid-distance runner"));
        assert_eq!(updated.name, "Alice");

        let in_directory = state
            .known_users()
            .into_iter()
            .find(|u| u.id == id)
            .unwrap();
        assert_eq!(in_directory, updated);
    }

    #[tokio::test]
    async fn test_update_without_user_is_noop() {
        let state = store();
        state.update_profile(ProfilePatch {
            name: Some("Nobody".into()),
            ..ProfilePatch::default()
        });
        assert!(state.user().is_none());
    }

    #[tokio::test]
    async fn test_search_matches_name_role_sport_and_location() {
        let state = store();
        let mut coach = UserProfile::new("Pat Summers", "pat@example.com", Role::Coach);
        coach.sport = Some("Basketball".into());
        coach.location = Some("Chicago".into());
        state.upsert_known_user(coach);

        let athlete = UserProfile::new("Sam Rivers", "sam@example.com", Role::Athlete);
        state.upsert_known_user(athlete);

        assert_eq!(state.search_users("pat").len(), 1);
        assert_eq!(state.search_users("coach").len(), 1);
        assert_eq!(state.search_users("basket").len(), 1);
        assert_eq!(state.search_users("chicago").len(), 1);
        assert_eq!(state.search_users("rivers").len(), 1);
        assert_eq!(state.search_users("  ").len(), 0);
        assert_eq!(state.search_users("nobody").len(), 0);
    }

    #[tokio::test]
    async fn test_sign_out_clears_record_and_onboarding() {
        let state = store();
        state.set_user(UserProfile::new("Alice", "a@example.com", Role::Athlete));
        state.complete_onboarding();
        assert!(state.is_onboarded());

        state.sign_out();
        assert!(state.user().is_none());
        assert!(!state.is_onboarded());
    }

    #[tokio::test]
    async fn test_round_trip_through_storage() {
        let storage = Arc::new(MemoryStorageHandler::new());
        let state = ProfileState::new(Arc::clone(&storage));

        let user = UserProfile::new("Alice", "alice@example.com", Role::Athlete);
        state.set_user(user.clone());
        state.upsert_known_user(user);
        state.complete_onboarding();
        state.persist().await.unwrap();

        let reloaded = ProfileState::new(storage);
        reloaded.hydrate().await;

        assert_eq!(reloaded.user(), state.user());
        assert_eq!(reloaded.known_users(), state.known_users());
        assert!(reloaded.is_onboarded());
        assert!(reloaded.hydrated());
    }
}
