use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::core::recommend::RecommendationEngine;
use crate::core::store::ProfileStore;
use crate::error::ProfileError;
use crate::models::{
    ProfileDraft, ProfileState, ProfileUpdate, RoommateProfile, ScoredProfile, SearchFilters,
    SeedIdentity,
};
use crate::services::ProfileSubscription;

/// Reactive matching view for one signed-in user
///
/// Keeps `current_user_profile` and `recommended_matches` up to date:
/// recommendations are recomputed on every change event of the user's own
/// profile and on every candidate reload. A background task owns the
/// profile subscription; dropping the session stops the task, which
/// releases the subscription.
pub struct MatchingSession {
    store: ProfileStore,
    user_id: Option<String>,
    profile_rx: watch::Receiver<ProfileState>,
    matches_rx: watch::Receiver<Vec<ScoredProfile>>,
    reload_tx: Option<mpsc::UnboundedSender<()>>,
    task: Option<JoinHandle<()>>,
}

impl MatchingSession {
    /// Start observing `user_id`'s profile
    ///
    /// Without a signed-in user the session stays empty and every mutating
    /// call fails with `NotAuthenticated`.
    pub async fn start(
        store: ProfileStore,
        engine: RecommendationEngine,
        user_id: Option<&str>,
    ) -> Result<Self, ProfileError> {
        let (profile_tx, profile_rx) = watch::channel(ProfileState::NonExistent);
        let (matches_tx, matches_rx) = watch::channel(Vec::new());

        let user_id = match user_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id.to_string(),
            None => {
                return Ok(Self {
                    store,
                    user_id: None,
                    profile_rx,
                    matches_rx,
                    reload_tx: None,
                    task: None,
                })
            }
        };

        let subscription = store.subscribe(&user_id).await?;
        let (reload_tx, reload_rx) = mpsc::unbounded_channel();

        let worker = SessionWorker {
            store: store.clone(),
            engine,
            user_id: user_id.clone(),
            profile_tx,
            matches_tx,
        };
        let task = tokio::spawn(worker.run(subscription, reload_rx));

        tracing::info!("Started matching session for {}", user_id);

        Ok(Self {
            store,
            user_id: Some(user_id),
            profile_rx,
            matches_rx,
            reload_tx: Some(reload_tx),
            task: Some(task),
        })
    }

    fn require_user(&self, action: &'static str) -> Result<&str, ProfileError> {
        self.user_id
            .as_deref()
            .ok_or(ProfileError::NotAuthenticated(action))
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Latest known state of the user's own profile
    pub fn profile_state(&self) -> ProfileState {
        self.profile_rx.borrow().clone()
    }

    pub fn current_user_profile(&self) -> Option<RoommateProfile> {
        self.profile_rx.borrow().profile().cloned()
    }

    /// Latest recommendations, best first
    pub fn recommended_matches(&self) -> Vec<RoommateProfile> {
        self.matches_rx
            .borrow()
            .iter()
            .map(|scored| scored.profile.clone())
            .collect()
    }

    /// Latest recommendations with their compatibility scores
    pub fn scored_matches(&self) -> Vec<ScoredProfile> {
        self.matches_rx.borrow().clone()
    }

    pub fn watch_profile(&self) -> watch::Receiver<ProfileState> {
        self.profile_rx.clone()
    }

    pub fn watch_recommendations(&self) -> watch::Receiver<Vec<ScoredProfile>> {
        self.matches_rx.clone()
    }

    /// Reload the candidate pool and recompute recommendations
    pub fn reload_candidates(&self) {
        if let Some(tx) = &self.reload_tx {
            if tx.send(()).is_err() {
                tracing::warn!("Matching session task has stopped; reload ignored");
            }
        }
    }

    pub async fn create_profile(
        &self,
        seed: &SeedIdentity,
        draft: ProfileDraft,
    ) -> Result<RoommateProfile, ProfileError> {
        let user_id = self.require_user("create a profile")?;
        self.store.create_profile(user_id, seed, draft).await
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<RoommateProfile, ProfileError> {
        let user_id = self.require_user("update a profile")?;
        self.store.update_profile(user_id, update).await
    }

    pub async fn delete_profile(&self) -> Result<(), ProfileError> {
        let user_id = self.require_user("delete a profile")?;
        self.store.delete_profile(user_id).await
    }

    pub async fn get_profile_by_id(&self, profile_id: &str) -> Result<Option<RoommateProfile>, ProfileError> {
        self.store.get_profile_by_id(profile_id).await
    }

    pub async fn search_profiles(&self, filters: &SearchFilters) -> Result<Vec<RoommateProfile>, ProfileError> {
        let user_id = self.require_user("search profiles")?;
        self.store.search_profiles(user_id, filters).await
    }

    /// Stop observing; already published values stay readable
    pub fn close(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Closed matching session for {:?}", self.user_id);
        }
        self.reload_tx = None;
    }
}

impl Drop for MatchingSession {
    fn drop(&mut self) {
        self.close();
    }
}

struct SessionWorker {
    store: ProfileStore,
    engine: RecommendationEngine,
    user_id: String,
    profile_tx: watch::Sender<ProfileState>,
    matches_tx: watch::Sender<Vec<ScoredProfile>>,
}

impl SessionWorker {
    async fn run(self, mut subscription: ProfileSubscription, mut reload_rx: mpsc::UnboundedReceiver<()>) {
        let mut current = ProfileState::NonExistent;

        loop {
            tokio::select! {
                state = subscription.next() => {
                    match state {
                        Some(state) => {
                            current = state;
                            self.profile_tx.send_replace(current.clone());
                        }
                        None => {
                            tracing::warn!("Profile change feed for {} ended", self.user_id);
                            break;
                        }
                    }
                }
                reload = reload_rx.recv() => {
                    if reload.is_none() {
                        break;
                    }
                }
            }

            self.refresh(&current).await;
        }
    }

    async fn refresh(&self, current: &ProfileState) {
        let Some(me) = current.profile() else {
            self.matches_tx.send_replace(Vec::new());
            return;
        };

        match self.store.load_candidates(&self.user_id).await {
            Ok(candidates) => {
                let result = self.engine.recommend_top(me, candidates, self.engine.limit());
                tracing::debug!(
                    "Refreshed {} recommendations for {} from {} candidates",
                    result.matches.len(),
                    self.user_id,
                    result.total_candidates
                );
                self.matches_tx.send_replace(result.matches);
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load candidates for {}, keeping previous recommendations: {}",
                    self.user_id,
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryProfileRepository;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_anonymous_session_rejects_writes() {
        let store = ProfileStore::new(Arc::new(InMemoryProfileRepository::new()));
        let session = MatchingSession::start(store, RecommendationEngine::default(), None)
            .await
            .unwrap();

        assert!(session.current_user_profile().is_none());
        assert!(session.recommended_matches().is_empty());

        let err = session.delete_profile().await.unwrap_err();
        assert!(matches!(err, ProfileError::NotAuthenticated(_)));
    }

    #[tokio::test]
    async fn test_drop_releases_subscription() {
        let repo = Arc::new(InMemoryProfileRepository::new());
        let store = ProfileStore::new(repo.clone());

        let session = MatchingSession::start(store, RecommendationEngine::default(), Some("u1"))
            .await
            .unwrap();
        assert_eq!(repo.subscriber_count("u1"), 1);

        drop(session);
        // Aborted tasks drop their state on the next scheduler pass
        for _ in 0..10 {
            if repo.subscriber_count("u1") == 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(repo.subscriber_count("u1"), 0);
    }
}
