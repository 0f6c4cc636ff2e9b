/// Book data provider abstraction
///
/// The recommendation engine only needs free-text search plus two scoped
/// query forms. Providers may be slow, may fail and may return the same book
/// from different queries; callers deal with all three.
use crate::{error::AppResult, models::Book};

pub mod open_library;

pub use open_library::OpenLibrarySource;

/// Trait for book search providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BookSource: Send + Sync {
    /// Free-text search returning at most `limit` books
    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<Book>>;

    /// Books tagged with `genre`
    async fn search_by_genre(&self, genre: &str, limit: usize) -> AppResult<Vec<Book>> {
        self.search(&format!("subject:{}", genre), limit).await
    }

    /// Books written by `author`
    async fn search_by_author(&self, author: &str, limit: usize) -> AppResult<Vec<Book>> {
        self.search(&format!("author:{}", author), limit).await
    }
}
