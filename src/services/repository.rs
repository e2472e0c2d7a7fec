use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::core::filters::matches_filters;
use crate::models::{ProfileState, RoommateProfile, SearchFilters};

/// Errors that can occur when talking to a profile repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

type ReleaseFn = Box<dyn FnOnce() + Send + Sync>;

/// Live view of one user's profile
///
/// Yields the current state first, then every subsequent change. The change
/// handler registered with the repository is released when the subscription
/// is dropped or cancelled.
pub struct ProfileSubscription {
    user_id: String,
    receiver: mpsc::UnboundedReceiver<ProfileState>,
    release: Option<ReleaseFn>,
}

impl ProfileSubscription {
    pub fn new<F>(user_id: &str, receiver: mpsc::UnboundedReceiver<ProfileState>, release: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            user_id: user_id.to_string(),
            receiver,
            release: Some(Box::new(release)),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Wait for the next state; `None` once the change feed has ended
    pub async fn next(&mut self) -> Option<ProfileState> {
        self.receiver.recv().await
    }

    /// Stop receiving notifications
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ProfileSubscription {
    fn drop(&mut self) {
        self.receiver.close();
        if let Some(release) = self.release.take() {
            release();
            tracing::trace!("Released profile subscription for {}", self.user_id);
        }
    }
}

impl std::fmt::Debug for ProfileSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileSubscription")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// Durable store of one roommate profile per user
///
/// Implementations own transport, retries and timeouts; callers see each
/// failure once as a `RepositoryError`.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Point lookup by owning user id
    async fn get(&self, user_id: &str) -> Result<Option<RoommateProfile>, RepositoryError>;

    /// Insert or replace the profile stored under `user_id`
    async fn upsert(&self, user_id: &str, profile: &RoommateProfile) -> Result<(), RepositoryError>;

    /// Remove the profile; returns whether a record existed
    async fn delete(&self, user_id: &str) -> Result<bool, RepositoryError>;

    /// Every stored profile
    async fn query_all(&self) -> Result<Vec<RoommateProfile>, RepositoryError>;

    /// Profiles matching the search predicates
    async fn query(&self, filters: &SearchFilters) -> Result<Vec<RoommateProfile>, RepositoryError> {
        let profiles = self.query_all().await?;
        Ok(profiles
            .into_iter()
            .filter(|profile| matches_filters(profile, filters))
            .collect())
    }

    /// Observe one user's profile until the returned handle is dropped
    async fn subscribe(&self, user_id: &str) -> Result<ProfileSubscription, RepositoryError>;
}
