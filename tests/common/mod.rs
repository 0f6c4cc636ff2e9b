#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bonder_api::{
    db::InMemoryProfileStore,
    error::{AppError, AppResult},
    models::Book,
    services::{providers::BookSource, EngineSettings, RecommendationEngine},
};

/// Books with nothing but an id and a title
pub fn placeholder_books(prefix: &str, count: usize) -> Vec<Book> {
    (0..count)
        .map(|i| Book::new(format!("{}-{}", prefix, i), format!("Book {}", i)))
        .collect()
}

/// Returns canned results per raw query and records every query it sees
///
/// Only `search` is implemented, so genre and author lookups arrive as
/// `subject:<genre>` and `author:<name>`.
#[derive(Default)]
pub struct ScriptedSource {
    results: HashMap<String, Vec<Book>>,
    fallback: Option<Vec<Book>>,
    failing: Vec<String>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same books for every query
    pub fn always(books: Vec<Book>) -> Self {
        Self {
            fallback: Some(books),
            ..Self::default()
        }
    }

    pub fn on(mut self, query: &str, books: Vec<Book>) -> Self {
        self.results.insert(query.to_string(), books);
        self
    }

    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing.push(query.to_string());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl BookSource for ScriptedSource {
    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<Book>> {
        self.seen.lock().unwrap().push(query.to_string());

        if self.failing.iter().any(|q| q == query) {
            return Err(AppError::ExternalApi(format!("{} unavailable", query)));
        }

        let books = self
            .results
            .get(query)
            .or(self.fallback.as_ref())
            .cloned()
            .unwrap_or_default();
        Ok(books.into_iter().take(limit).collect())
    }
}

/// A source whose every call fails
pub struct UnreachableSource;

#[async_trait::async_trait]
impl BookSource for UnreachableSource {
    async fn search(&self, _query: &str, _limit: usize) -> AppResult<Vec<Book>> {
        Err(AppError::ExternalApi("connection refused".to_string()))
    }
}

/// A source that answers only after `delay`
pub struct SlowSource {
    pub delay: Duration,
    pub books: Vec<Book>,
}

#[async_trait::async_trait]
impl BookSource for SlowSource {
    async fn search(&self, _query: &str, _limit: usize) -> AppResult<Vec<Book>> {
        tokio::time::sleep(self.delay).await;
        Ok(self.books.clone())
    }
}

pub async fn engine_with(
    source: Arc<dyn BookSource>,
    store: Arc<InMemoryProfileStore>,
) -> RecommendationEngine {
    RecommendationEngine::load("reader", source, store, EngineSettings::default()).await
}
