use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::core::filters;
use crate::error::ProfileError;
use crate::models::{ProfileDraft, ProfileUpdate, RoommateProfile, SearchFilters, SeedIdentity};
use crate::services::{ProfileRepository, ProfileSubscription};

/// Profile lifecycle operations on top of a `ProfileRepository`
///
/// Writes return once the repository acknowledges them. Observers learn
/// about the new value through their subscription, not from the return
/// value, so a cached copy is only current after the change event arrives.
#[derive(Clone)]
pub struct ProfileStore {
    repository: Arc<dyn ProfileRepository>,
}

fn require_user(user_id: &str, action: &'static str) -> Result<(), ProfileError> {
    if user_id.trim().is_empty() {
        return Err(ProfileError::NotAuthenticated(action));
    }
    Ok(())
}

impl ProfileStore {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    /// Observe a user's profile: current state first, then every change
    pub async fn subscribe(&self, user_id: &str) -> Result<ProfileSubscription, ProfileError> {
        let subscription = self.repository.subscribe(user_id).await?;
        tracing::debug!("Subscribed to profile changes for {}", user_id);
        Ok(subscription)
    }

    /// Create the profile for `user_id`, or overwrite the existing one
    ///
    /// Identity fields come from `seed`; everything else from `draft`. A
    /// repeated create keeps the original `created_at`.
    pub async fn create_profile(
        &self,
        user_id: &str,
        seed: &SeedIdentity,
        draft: ProfileDraft,
    ) -> Result<RoommateProfile, ProfileError> {
        require_user(user_id, "create a profile")?;
        draft.validate()?;

        let mut profile = RoommateProfile::from_seed(user_id, seed, draft, Utc::now());

        if let Some(existing) = self.repository.get(user_id).await? {
            profile.created_at = existing.created_at;
        }

        self.repository.upsert(user_id, &profile).await.map_err(|e| {
            tracing::error!("Failed to create roommate profile for {}: {}", user_id, e);
            e
        })?;

        tracing::info!("Saved roommate profile for {}", user_id);
        Ok(profile)
    }

    /// Merge `update` into the stored profile and refresh `updated_at`
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<RoommateProfile, ProfileError> {
        require_user(user_id, "update a profile")?;
        update.validate()?;

        let mut profile = self
            .repository
            .get(user_id)
            .await?
            .ok_or_else(|| ProfileError::ProfileNotFound(user_id.to_string()))?;

        update.apply_to(&mut profile, Utc::now());
        profile.validate()?;

        self.repository.upsert(user_id, &profile).await.map_err(|e| {
            tracing::error!("Failed to update roommate profile for {}: {}", user_id, e);
            e
        })?;

        tracing::info!("Updated roommate profile for {}", user_id);
        Ok(profile)
    }

    /// Remove the profile owned by `user_id`
    pub async fn delete_profile(&self, user_id: &str) -> Result<(), ProfileError> {
        require_user(user_id, "delete a profile")?;

        let removed = self.repository.delete(user_id).await.map_err(|e| {
            tracing::error!("Failed to delete roommate profile for {}: {}", user_id, e);
            e
        })?;

        if !removed {
            return Err(ProfileError::ProfileNotFound(user_id.to_string()));
        }

        tracing::info!("Deleted roommate profile for {}", user_id);
        Ok(())
    }

    /// Look up any user's profile
    pub async fn get_profile_by_id(&self, profile_id: &str) -> Result<Option<RoommateProfile>, ProfileError> {
        Ok(self.repository.get(profile_id).await?)
    }

    /// Profiles matching `filters`, never including the caller's own
    pub async fn search_profiles(
        &self,
        user_id: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<RoommateProfile>, ProfileError> {
        require_user(user_id, "search profiles")?;

        let profiles = self.repository.query(filters).await?;
        let results = filters::search(profiles, filters, user_id);

        tracing::debug!("Search by {} matched {} profiles", user_id, results.len());
        Ok(results)
    }

    /// The candidate pool for `user_id`: every profile but their own
    pub async fn load_candidates(&self, user_id: &str) -> Result<Vec<RoommateProfile>, ProfileError> {
        let profiles = self.repository.query_all().await?;
        Ok(profiles.into_iter().filter(|p| p.id != user_id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, Lifestyle};
    use crate::services::InMemoryProfileRepository;

    fn draft(min: f64, max: f64) -> ProfileDraft {
        ProfileDraft {
            budget: Budget::new(min, max),
            preferred_locations: ["Andheri".to_string()].into_iter().collect(),
            lifestyle: Lifestyle::default(),
            bio: "Working professional, tidy".to_string(),
            looking_for: "A calm flatmate".to_string(),
        }
    }

    fn seed() -> SeedIdentity {
        SeedIdentity {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: None,
            avatar_url: None,
        }
    }

    fn store() -> (ProfileStore, Arc<InMemoryProfileRepository>) {
        let repo = Arc::new(InMemoryProfileRepository::new());
        (ProfileStore::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_create_copies_seed_identity() {
        let (store, _) = store();

        let profile = store.create_profile("u1", &seed(), draft(100.0, 200.0)).await.unwrap();

        assert_eq!(profile.id, "u1");
        assert_eq!(profile.display_name(), "Asha Rao");
        assert_eq!(profile.email, "asha@example.com");
    }

    #[tokio::test]
    async fn test_create_without_user_fails() {
        let (store, repo) = store();

        let err = store.create_profile("", &seed(), draft(100.0, 200.0)).await.unwrap_err();

        assert!(matches!(err, ProfileError::NotAuthenticated(_)));
        assert!(repo.query_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_validation_fails_before_repository_call() {
        let (store, repo) = store();
        // An offline repository would fail any call that reached it
        repo.set_offline(true);

        let err = store.create_profile("u1", &seed(), draft(300.0, 200.0)).await.unwrap_err();

        assert!(matches!(err, ProfileError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_missing_profile() {
        let (store, _) = store();

        let err = store
            .update_profile("ghost", ProfileUpdate::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProfileError::ProfileNotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let (store, repo) = store();
        let created = store.create_profile("u1", &seed(), draft(100.0, 200.0)).await.unwrap();

        let updated = store
            .update_profile(
                "u1",
                ProfileUpdate {
                    budget: Some(Budget::new(150.0, 180.0)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.budget, Budget::new(150.0, 180.0));
        assert_eq!(updated.bio, created.bio);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(repo.get("u1").await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_delete_missing_profile() {
        let (store, _) = store();

        let err = store.delete_profile("ghost").await.unwrap_err();

        assert!(matches!(err, ProfileError::ProfileNotFound(_)));
    }

    #[tokio::test]
    async fn test_repository_failure_is_surfaced() {
        let (store, repo) = store();
        repo.set_offline(true);

        let err = store.get_profile_by_id("u1").await.unwrap_err();

        assert!(matches!(err, ProfileError::RepositoryUnavailable(_)));
    }
}
