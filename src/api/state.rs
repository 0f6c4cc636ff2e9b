use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::{
    db::ProfileStore,
    services::{providers::BookSource, EngineSettings, RecommendationEngine},
};

/// Bounds for the per-user engine registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrySettings {
    /// Most engines kept at once; least recently used ones are evicted first
    pub capacity: u64,
    /// Engines untouched for this long are dropped
    pub idle_timeout: Duration,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            idle_timeout: Duration::from_secs(30 * 60),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<AppStateInner>,
}

/// Collaborators plus one engine per active user, created on first use
pub struct AppStateInner {
    pub source: Arc<dyn BookSource>,
    pub store: Arc<dyn ProfileStore>,
    pub settings: EngineSettings,
    engines: Cache<String, Arc<RecommendationEngine>>,
}

/// An engine whose profile load failed; handed out but never registered
struct DegradedLoad(Arc<RecommendationEngine>);

impl AppState {
    pub fn new(
        source: Arc<dyn BookSource>,
        store: Arc<dyn ProfileStore>,
        settings: EngineSettings,
    ) -> Self {
        Self::with_registry(source, store, settings, RegistrySettings::default())
    }

    pub fn with_registry(
        source: Arc<dyn BookSource>,
        store: Arc<dyn ProfileStore>,
        settings: EngineSettings,
        registry: RegistrySettings,
    ) -> Self {
        let engines = Cache::builder()
            .max_capacity(registry.capacity)
            .time_to_idle(registry.idle_timeout)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                source,
                store,
                settings,
                engines,
            }),
        }
    }

    /// The engine owning `user_id`'s profile
    ///
    /// Concurrent first requests for one user share a single load; other users
    /// are never blocked by it. An engine whose load hit a store failure is
    /// returned for this request only, so the next request retries the load.
    pub async fn engine_for(&self, user_id: &str) -> Arc<RecommendationEngine> {
        let inner = &self.inner;
        let loaded = inner
            .engines
            .try_get_with(user_id.to_string(), async {
                let engine = Arc::new(
                    RecommendationEngine::load(
                        user_id,
                        Arc::clone(&inner.source),
                        Arc::clone(&inner.store),
                        inner.settings,
                    )
                    .await,
                );

                if engine.is_degraded() {
                    return Err(DegradedLoad(engine));
                }
                tracing::debug!(user_id = %user_id, "Engine created");
                Ok(engine)
            })
            .await;

        match loaded {
            Ok(engine) => engine,
            Err(degraded) => Arc::clone(&degraded.0),
        }
    }

    /// Number of engines currently held
    pub async fn active_engines(&self) -> u64 {
        self.inner.engines.run_pending_tasks().await;
        self.inner.engines.entry_count()
    }
}
