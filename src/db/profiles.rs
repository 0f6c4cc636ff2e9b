//! Durable storage for preference profiles.
//!
//! The engine treats the store as the source of truth when a user's engine is
//! created and writes to it after every mutation. Stores are keyed by user id.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::{
    db::{Cache, CacheKey},
    error::AppResult,
    models::PreferenceProfile,
};

/// Load/save capability for preference profiles
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns the stored profile, or `None` for a user seen for the first time
    async fn load(&self, user_id: &str) -> AppResult<Option<PreferenceProfile>>;

    /// Stores `profile`; may return before the write is durable
    async fn save(&self, user_id: &str, profile: &PreferenceProfile) -> AppResult<()>;
}

/// Profiles stored as JSON under `profile:{user_id}` in Redis
///
/// Saves go through the cache's background writer, so they return immediately
/// and reach Redis in the order they were issued.
#[derive(Clone)]
pub struct RedisProfileStore {
    cache: Cache,
}

impl RedisProfileStore {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }
}

#[async_trait::async_trait]
impl ProfileStore for RedisProfileStore {
    async fn load(&self, user_id: &str) -> AppResult<Option<PreferenceProfile>> {
        self.cache
            .get_from_cache(&CacheKey::Profile(user_id.to_string()))
            .await
    }

    async fn save(&self, user_id: &str, profile: &PreferenceProfile) -> AppResult<()> {
        self.cache
            .set_in_background(&CacheKey::Profile(user_id.to_string()), profile, None)?;
        tracing::debug!(user_id = %user_id, "Profile write queued");
        Ok(())
    }
}

/// Process-local store for tests and Redis-less runs
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, PreferenceProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `profile` for `user_id`
    pub fn with_profile(user_id: &str, profile: PreferenceProfile) -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(user_id.to_string(), profile);
        Self {
            profiles: RwLock::new(profiles),
        }
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(&self, user_id: &str) -> AppResult<Option<PreferenceProfile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn save(&self, user_id: &str, profile: &PreferenceProfile) -> AppResult<()> {
        self.profiles
            .write()
            .await
            .insert(user_id.to_string(), profile.clone());
        Ok(())
    }
}
