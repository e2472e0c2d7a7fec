use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::models::{ProfileState, RoommateProfile};
use crate::services::repository::{ProfileRepository, ProfileSubscription, RepositoryError};

type Subscribers = HashMap<String, HashMap<Uuid, mpsc::UnboundedSender<ProfileState>>>;

/// Process-local profile repository with push-based change notifications
///
/// Profiles are kept in insertion order so bulk queries are deterministic.
/// Used for local development and tests.
#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<Vec<RoommateProfile>>,
    subscribers: Arc<Mutex<Subscribers>>,
    offline: AtomicBool,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: every call fails with `Unavailable` while offline
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of live change handlers registered for a user
    pub fn subscriber_count(&self, user_id: &str) -> usize {
        lock(&self.subscribers)
            .get(user_id)
            .map_or(0, |handlers| handlers.len())
    }

    fn ensure_online(&self) -> Result<(), RepositoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "in-memory repository is offline".to_string(),
            ));
        }
        Ok(())
    }

    fn notify(&self, user_id: &str, state: ProfileState) {
        let mut subscribers = lock(&self.subscribers);
        if let Some(handlers) = subscribers.get_mut(user_id) {
            handlers.retain(|_, tx| tx.send(state.clone()).is_ok());
            tracing::trace!("Notified {} subscribers of {}", handlers.len(), user_id);
            if handlers.is_empty() {
                subscribers.remove(user_id);
            }
        }
    }
}

fn lock(subscribers: &Mutex<Subscribers>) -> MutexGuard<'_, Subscribers> {
    subscribers.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn get(&self, user_id: &str) -> Result<Option<RoommateProfile>, RepositoryError> {
        self.ensure_online()?;
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.id == user_id).cloned())
    }

    async fn upsert(&self, user_id: &str, profile: &RoommateProfile) -> Result<(), RepositoryError> {
        self.ensure_online()?;
        let mut profiles = self.profiles.write().await;

        let mut stored = profile.clone();
        stored.id = user_id.to_string();

        match profiles.iter_mut().find(|p| p.id == user_id) {
            Some(existing) => *existing = stored.clone(),
            None => profiles.push(stored.clone()),
        }

        self.notify(user_id, ProfileState::Active(stored));
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<bool, RepositoryError> {
        self.ensure_online()?;
        let mut profiles = self.profiles.write().await;

        let before = profiles.len();
        profiles.retain(|p| p.id != user_id);
        let removed = profiles.len() < before;

        if removed {
            self.notify(user_id, ProfileState::NonExistent);
        }
        Ok(removed)
    }

    async fn query_all(&self) -> Result<Vec<RoommateProfile>, RepositoryError> {
        self.ensure_online()?;
        Ok(self.profiles.read().await.clone())
    }

    async fn subscribe(&self, user_id: &str) -> Result<ProfileSubscription, RepositoryError> {
        self.ensure_online()?;

        // Holding the read lock orders registration against concurrent writes
        let profiles = self.profiles.read().await;
        let current = profiles.iter().find(|p| p.id == user_id).cloned();

        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(ProfileState::from(current));

        let handler_id = Uuid::new_v4();
        lock(&self.subscribers)
            .entry(user_id.to_string())
            .or_default()
            .insert(handler_id, tx);
        drop(profiles);

        let subscribers = Arc::clone(&self.subscribers);
        let owner = user_id.to_string();
        Ok(ProfileSubscription::new(user_id, rx, move || {
            let mut subscribers = lock(&subscribers);
            if let Some(handlers) = subscribers.get_mut(&owner) {
                handlers.remove(&handler_id);
                if handlers.is_empty() {
                    subscribers.remove(&owner);
                }
            }
        }))
    }
}
