use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::{
    db::ProfileStore,
    error::AppError,
    models::{Book, PreferenceProfile, UserAction},
    services::{
        actions, candidates,
        providers::BookSource,
        scoring::{self, ScoreBreakdown},
        training,
    },
};

/// Timeouts applied to collaborator calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Per sub-query bound for book searches
    pub source_timeout: Duration,
    /// Bound for a single profile load or save
    pub store_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            source_timeout: Duration::from_secs(5),
            store_timeout: Duration::from_secs(2),
        }
    }
}

/// Recommendation engine for a single user
///
/// Holds the user's profile in memory and is its only writer. `train` and
/// `record` run mutate, normalize and persist inside one critical section, so
/// concurrent actions never lose updates. No operation fails: collaborator
/// errors are logged and degrade to an empty result or a skipped write.
pub struct RecommendationEngine {
    user_id: String,
    profile: Mutex<PreferenceProfile>,
    source: Arc<dyn BookSource>,
    store: Arc<dyn ProfileStore>,
    settings: EngineSettings,
    degraded: bool,
}

impl RecommendationEngine {
    /// Creates the engine for `user_id`, starting from the stored profile
    ///
    /// A missing, unreadable or slow-to-load profile starts the user empty. When
    /// the store itself failed the engine is marked degraded (see [`Self::is_degraded`]).
    pub async fn load(
        user_id: impl Into<String>,
        source: Arc<dyn BookSource>,
        store: Arc<dyn ProfileStore>,
        settings: EngineSettings,
    ) -> Self {
        let user_id = user_id.into();

        let loaded = match tokio::time::timeout(settings.store_timeout, store.load(&user_id)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(settings.store_timeout)),
        };

        let mut degraded = false;
        let profile = match loaded {
            Ok(Some(profile)) => {
                tracing::info!(
                    user_id = %user_id,
                    genres = profile.genre_weights.len(),
                    authors = profile.author_weights.len(),
                    "Loaded preference profile"
                );
                profile
            }
            Ok(None) => {
                tracing::info!(user_id = %user_id, "No stored profile, starting empty");
                PreferenceProfile::new()
            }
            Err(AppError::Serialization(e)) => {
                tracing::warn!(user_id = %user_id, error = %e, "Stored profile unreadable, starting empty");
                PreferenceProfile::new()
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "Profile load failed, running on an empty profile without saving"
                );
                degraded = true;
                PreferenceProfile::new()
            }
        };

        Self {
            user_id,
            profile: Mutex::new(profile),
            source,
            store,
            settings,
            degraded,
        }
    }

    /// True when the stored profile could not be reached at load time
    ///
    /// A degraded engine never saves, so the stored profile is not overwritten
    /// by one built on an empty start.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Copy of the current in-memory profile
    pub async fn profile(&self) -> PreferenceProfile {
        self.profile.lock().await.clone()
    }

    /// Onboarding: replaces genre weights, accumulates author weights and liked ids
    pub async fn train(&self, selected_genres: &[String], liked_books: &[Book]) {
        let mut profile = self.profile.lock().await;
        training::train(&mut profile, selected_genres, liked_books);

        tracing::info!(
            user_id = %self.user_id,
            genres = selected_genres.len(),
            liked_books = liked_books.len(),
            "Trained preference profile"
        );

        self.persist(&profile).await;
    }

    /// Up to `count` unseen books, best first
    pub async fn recommend(&self, count: usize) -> Vec<Book> {
        if count == 0 {
            return Vec::new();
        }

        // Snapshot so network calls never hold the profile lock
        let profile = self.profile().await;
        let queries = candidates::plan_queries(&profile);
        let query_count = queries.len();

        let found = candidates::fetch_candidates(
            Arc::clone(&self.source),
            queries,
            self.settings.source_timeout,
        )
        .await;
        let candidate_count = found.len();

        let ranked = candidates::rank(found, &profile, count);

        tracing::info!(
            user_id = %self.user_id,
            queries = query_count,
            candidates = candidate_count,
            returned = ranked.len(),
            "Recommendations generated"
        );

        ranked.into_iter().map(|scored| scored.book).collect()
    }

    /// Applies a swipe reaction; books without an id are ignored
    pub async fn record(&self, book: &Book, action: UserAction) {
        let mut profile = self.profile.lock().await;
        if !actions::apply_action(&mut profile, book, action) {
            tracing::debug!(user_id = %self.user_id, "Ignoring action on book without id");
            return;
        }

        tracing::info!(
            user_id = %self.user_id,
            book_id = %book.id,
            action = ?action,
            "Recorded user action"
        );

        self.persist(&profile).await;
    }

    /// Relevance of `book` under the current profile
    pub async fn score(&self, book: &Book) -> f64 {
        self.explain(book).await.score
    }

    /// Relevance of `book` with every contributing signal
    pub async fn explain(&self, book: &Book) -> ScoreBreakdown {
        let profile = self.profile.lock().await;
        scoring::explain(book, &profile)
    }

    /// Writes the profile; called with the profile lock held so writes stay ordered
    async fn persist(&self, profile: &PreferenceProfile) {
        if self.degraded {
            tracing::debug!(user_id = %self.user_id, "Skipping save on degraded engine");
            return;
        }

        let saved = match tokio::time::timeout(
            self.settings.store_timeout,
            self.store.save(&self.user_id, profile),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(self.settings.store_timeout)),
        };

        if let Err(e) = saved {
            tracing::warn!(
                user_id = %self.user_id,
                error = %e,
                "Profile save failed, keeping in-memory state"
            );
        }
    }
}
