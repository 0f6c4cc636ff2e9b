//! Candidate sourcing and ranking.
//!
//! Queries are planned from the profile's heaviest genres and authors plus
//! one profile-independent exploration query. They run concurrently but are
//! joined in plan order, so arrival order never affects the result.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    models::{Book, PreferenceProfile},
    services::{
        providers::BookSource,
        scoring::{explain, ScoreBreakdown},
    },
};

pub const TOP_GENRES: usize = 5;
pub const GENRE_QUERY_LIMIT: usize = 15;
pub const TOP_AUTHORS: usize = 3;
pub const AUTHOR_QUERY_LIMIT: usize = 10;
pub const EXPLORATION_QUERY: &str = "bestseller";
pub const EXPLORATION_QUERY_LIMIT: usize = 10;

/// One sub-query issued to the book source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateQuery {
    Genre(String),
    Author(String),
    /// Popular books regardless of learned taste
    Exploration,
}

impl fmt::Display for CandidateQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateQuery::Genre(genre) => write!(f, "genre:{}", genre),
            CandidateQuery::Author(author) => write!(f, "author:{}", author),
            CandidateQuery::Exploration => write!(f, "explore:{}", EXPLORATION_QUERY),
        }
    }
}

impl CandidateQuery {
    async fn run(&self, source: &dyn BookSource) -> AppResult<Vec<Book>> {
        match self {
            CandidateQuery::Genre(genre) => source.search_by_genre(genre, GENRE_QUERY_LIMIT).await,
            CandidateQuery::Author(author) => {
                source.search_by_author(author, AUTHOR_QUERY_LIMIT).await
            }
            CandidateQuery::Exploration => {
                source.search(EXPLORATION_QUERY, EXPLORATION_QUERY_LIMIT).await
            }
        }
    }
}

/// A candidate with its score
#[derive(Debug, Clone)]
pub struct ScoredBook {
    pub book: Book,
    pub breakdown: ScoreBreakdown,
}

/// Sub-queries for `profile`: top genres, then top authors, then exploration
pub fn plan_queries(profile: &PreferenceProfile) -> Vec<CandidateQuery> {
    let genres = profile
        .genre_weights
        .top(TOP_GENRES)
        .into_iter()
        .map(|genre| CandidateQuery::Genre(genre.to_string()));
    let authors = profile
        .author_weights
        .top(TOP_AUTHORS)
        .into_iter()
        .map(|author| CandidateQuery::Author(author.to_string()));

    genres
        .chain(authors)
        .chain(std::iter::once(CandidateQuery::Exploration))
        .collect()
}

/// Runs every query concurrently and concatenates the results in plan order
///
/// A query that fails, panics or exceeds `timeout` contributes nothing.
pub async fn fetch_candidates(
    source: Arc<dyn BookSource>,
    queries: Vec<CandidateQuery>,
    timeout: Duration,
) -> Vec<Book> {
    let mut tasks = Vec::with_capacity(queries.len());

    for query in queries {
        let source = Arc::clone(&source);
        let task = tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, query.run(source.as_ref())).await {
                Ok(result) => result,
                Err(_) => Err(AppError::Timeout(timeout)),
            };
            (query, result)
        });
        tasks.push(task);
    }

    let mut candidates = Vec::new();
    let mut failures = 0usize;

    for task in tasks {
        match task.await {
            Ok((query, Ok(books))) => {
                tracing::debug!(query = %query, results = books.len(), "Candidate query completed");
                candidates.extend(books);
            }
            Ok((query, Err(e))) => {
                failures += 1;
                tracing::warn!(query = %query, error = %e, "Candidate query failed");
            }
            Err(e) => {
                failures += 1;
                tracing::error!(error = %e, "Candidate query task join error");
            }
        }
    }

    if failures > 0 {
        tracing::warn!(
            candidate_count = candidates.len(),
            failed_queries = failures,
            "Partial candidate fetch failure"
        );
    }

    candidates
}

/// Drops seen and duplicate books, scores the rest and keeps the best `count`
///
/// The first occurrence of an id wins. Sorting is stable, so equal scores
/// keep candidate order.
pub fn rank(candidates: Vec<Book>, profile: &PreferenceProfile, count: usize) -> Vec<ScoredBook> {
    let mut kept_ids = HashSet::new();

    let mut scored: Vec<ScoredBook> = candidates
        .into_iter()
        .filter(|book| !profile.has_seen(&book.id))
        .filter(|book| kept_ids.insert(book.id.clone()))
        .map(|book| {
            let breakdown = explain(&book, profile);
            ScoredBook { book, breakdown }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.breakdown
            .score
            .partial_cmp(&a.breakdown.score)
            .unwrap_or(Ordering::Equal)
    });
    scored.truncate(count);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockBookSource;

    fn books(ids: &[&str]) -> Vec<Book> {
        ids.iter().map(|id| Book::new(*id, *id)).collect()
    }

    fn ids(scored: &[ScoredBook]) -> Vec<&str> {
        scored.iter().map(|s| s.book.id.as_str()).collect()
    }

    #[test]
    fn test_plan_for_empty_profile_is_exploration_only() {
        let profile = PreferenceProfile::new();
        assert_eq!(plan_queries(&profile), vec![CandidateQuery::Exploration]);
    }

    #[test]
    fn test_plan_takes_top_five_genres_and_three_authors() {
        let mut profile = PreferenceProfile::new();
        for (i, genre) in ["a", "b", "c", "d", "e", "f", "g"].iter().enumerate() {
            profile.genre_weights.set(genre, 0.1 * (i as f64 + 1.0));
        }
        for author in ["w", "x", "y", "z"] {
            profile.author_weights.set(author, 1.0);
        }

        let plan = plan_queries(&profile);
        assert_eq!(
            plan,
            vec![
                CandidateQuery::Genre("g".to_string()),
                CandidateQuery::Genre("f".to_string()),
                CandidateQuery::Genre("e".to_string()),
                CandidateQuery::Genre("d".to_string()),
                CandidateQuery::Genre("c".to_string()),
                CandidateQuery::Author("w".to_string()),
                CandidateQuery::Author("x".to_string()),
                CandidateQuery::Author("y".to_string()),
                CandidateQuery::Exploration,
            ]
        );
    }

    #[test]
    fn test_rank_excludes_seen_books() {
        let mut profile = PreferenceProfile::new();
        profile.mark_liked("liked");
        profile.mark_disliked("disliked");

        let ranked = rank(books(&["liked", "fresh", "disliked"]), &profile, 10);
        assert_eq!(ids(&ranked), vec!["fresh"]);
    }

    #[test]
    fn test_rank_keeps_first_duplicate() {
        let profile = PreferenceProfile::new();
        let mut candidates = books(&["a", "b"]);
        candidates.push(Book::new("a", "second copy").with_rating(5.0));

        let ranked = rank(candidates, &profile, 10);
        assert_eq!(ids(&ranked), vec!["a", "b"]);
        assert_eq!(ranked[0].book.title, "a");
    }

    #[test]
    fn test_rank_orders_best_first_and_is_stable() {
        let profile = PreferenceProfile::new();
        let candidates = vec![
            Book::new("low", "").with_rating(1.0),
            Book::new("tie-1", ""),
            Book::new("high", "").with_rating(5.0),
            Book::new("tie-2", ""),
        ];

        let ranked = rank(candidates, &profile, 3);
        assert_eq!(ids(&ranked), vec!["high", "tie-1", "tie-2"]);
    }

    #[tokio::test]
    async fn test_fetch_concatenates_in_plan_order() {
        let mut source = MockBookSource::new();
        source
            .expect_search_by_genre()
            .returning(|genre, _| Ok(vec![Book::new(format!("genre-{}", genre), "")]));
        source
            .expect_search_by_author()
            .returning(|author, _| Ok(vec![Book::new(format!("author-{}", author), "")]));
        source
            .expect_search()
            .returning(|_, _| Ok(vec![Book::new("explore", "")]));

        let queries = vec![
            CandidateQuery::Genre("fantasy".to_string()),
            CandidateQuery::Author("x".to_string()),
            CandidateQuery::Exploration,
        ];
        let found = fetch_candidates(Arc::new(source), queries, Duration::from_secs(1)).await;

        let found_ids: Vec<&str> = found.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(found_ids, vec!["genre-fantasy", "author-x", "explore"]);
    }

    #[tokio::test]
    async fn test_failed_query_contributes_nothing() {
        let mut source = MockBookSource::new();
        source
            .expect_search_by_genre()
            .times(1)
            .returning(|_, _| Err(AppError::ExternalApi("down".to_string())));
        source
            .expect_search()
            .times(1)
            .returning(|_, _| Ok(vec![Book::new("explore", "")]));

        let queries = vec![
            CandidateQuery::Genre("fantasy".to_string()),
            CandidateQuery::Exploration,
        ];
        let found = fetch_candidates(Arc::new(source), queries, Duration::from_secs(1)).await;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "explore");
    }

    #[tokio::test]
    async fn test_limits_passed_to_source() {
        let mut source = MockBookSource::new();
        source
            .expect_search_by_genre()
            .withf(|_, limit| *limit == GENRE_QUERY_LIMIT)
            .returning(|_, _| Ok(Vec::new()));
        source
            .expect_search_by_author()
            .withf(|_, limit| *limit == AUTHOR_QUERY_LIMIT)
            .returning(|_, _| Ok(Vec::new()));
        source
            .expect_search()
            .withf(|_, limit| *limit == EXPLORATION_QUERY_LIMIT)
            .returning(|_, _| Ok(Vec::new()));

        let queries = vec![
            CandidateQuery::Genre("fantasy".to_string()),
            CandidateQuery::Author("x".to_string()),
            CandidateQuery::Exploration,
        ];
        let found = fetch_candidates(Arc::new(source), queries, Duration::from_secs(1)).await;
        assert!(found.is_empty());
    }
}
