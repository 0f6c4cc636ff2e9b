/// Open Library search provider
///
/// Uses the public `/search.json` endpoint. Scoped queries rely on Open
/// Library's own `subject:` and `author:` search syntax, so the trait's
/// default implementations apply unchanged.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{Book, OpenLibrarySearchResponse},
    services::providers::BookSource,
};
use reqwest::Client as HttpClient;

/// Fields requested from the search endpoint; everything else is ignored
const SEARCH_FIELDS: &str = "key,title,author_name,subject,first_publish_year,ratings_average,number_of_pages_median,cover_i";

#[derive(Clone)]
pub struct OpenLibrarySource {
    http_client: HttpClient,
    api_url: String,
    cache: Cache,
    cache_ttl: u64,
}

impl OpenLibrarySource {
    pub fn new(cache: Cache, api_url: String, cache_ttl: u64) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
            cache_ttl,
        }
    }

    async fn fetch(&self, query: &str, limit: usize) -> AppResult<Vec<Book>> {
        let url = format!("{}/search.json", self.api_url);
        let limit_param = limit.to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("q", query),
                ("limit", limit_param.as_str()),
                ("fields", SEARCH_FIELDS),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Open Library returned status {}: {}",
                status, body
            )));
        }

        let search: OpenLibrarySearchResponse = response.json().await?;

        let books: Vec<Book> = search
            .docs
            .into_iter()
            .take(limit)
            .map(Book::from)
            .collect();

        tracing::info!(
            query = %query,
            results = books.len(),
            provider = "open_library",
            "Book search completed"
        );

        Ok(books)
    }
}

#[async_trait::async_trait]
impl BookSource for OpenLibrarySource {
    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<Book>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::BookSearch {
                query: query.to_string(),
                limit,
            },
            self.cache_ttl,
            self.fetch(query, limit)
        )
    }
}
