use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::models::{RoommateProfile, SearchFilters};
use crate::services::repository::{ProfileRepository, ProfileSubscription, RepositoryError};

/// Read-through cache in front of a profile repository
///
/// Point lookups (including misses) are kept in an in-memory moka cache for
/// the configured TTL. Writes through this repository invalidate the
/// affected entry before returning. Bulk queries and subscriptions always
/// go to the backing repository.
pub struct CachedProfileRepository {
    inner: Arc<dyn ProfileRepository>,
    cache: moka::future::Cache<String, Option<RoommateProfile>>,
    /// Bumped after every write, before its invalidation
    writes: AtomicU64,
}

impl CachedProfileRepository {
    pub fn new(inner: Arc<dyn ProfileRepository>, max_entries: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            inner,
            cache,
            writes: AtomicU64::new(0),
        }
    }

    /// Drop a cached lookup
    pub async fn invalidate(&self, user_id: &str) {
        self.cache.invalidate(&CacheKey::profile(user_id)).await;
    }

    async fn after_write(&self, user_id: &str) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.invalidate(user_id).await;
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a user's profile
    pub fn profile(user_id: &str) -> String {
        format!("profile:{}", user_id)
    }
}

#[async_trait]
impl ProfileRepository for CachedProfileRepository {
    async fn get(&self, user_id: &str) -> Result<Option<RoommateProfile>, RepositoryError> {
        let key = CacheKey::profile(user_id);
        if let Some(cached) = self.cache.get(&key).await {
            tracing::trace!("Profile cache hit: {}", key);
            return Ok(cached);
        }

        tracing::trace!("Profile cache miss: {}", key);
        let seen = self.writes.load(Ordering::SeqCst);
        let profile = self.inner.get(user_id).await?;
        self.cache.insert(key.clone(), profile.clone()).await;

        // A write that raced this read may have invalidated before our insert
        if self.writes.load(Ordering::SeqCst) != seen {
            self.cache.invalidate(&key).await;
        }
        Ok(profile)
    }

    async fn upsert(&self, user_id: &str, profile: &RoommateProfile) -> Result<(), RepositoryError> {
        let result = self.inner.upsert(user_id, profile).await;
        self.after_write(user_id).await;
        result
    }

    async fn delete(&self, user_id: &str) -> Result<bool, RepositoryError> {
        let result = self.inner.delete(user_id).await;
        self.after_write(user_id).await;
        result
    }

    async fn query_all(&self) -> Result<Vec<RoommateProfile>, RepositoryError> {
        self.inner.query_all().await
    }

    async fn query(&self, filters: &SearchFilters) -> Result<Vec<RoommateProfile>, RepositoryError> {
        self.inner.query(filters).await
    }

    async fn subscribe(&self, user_id: &str) -> Result<ProfileSubscription, RepositoryError> {
        self.inner.subscribe(user_id).await
    }
}
