use serde::Deserialize;
use uuid::Uuid;

use super::Book;

// ============================================================================
// Open Library Search API Types
// ============================================================================

/// Subjects beyond this many are dropped; the long tail dilutes the genre mean
const MAX_GENRES: usize = 8;

const COVER_URL_BASE: &str = "https://covers.openlibrary.org/b/id";

/// Raw response from `/search.json`
#[derive(Debug, Deserialize)]
pub struct OpenLibrarySearchResponse {
    #[serde(default)]
    pub docs: Vec<OpenLibraryDoc>,
}

/// A single search hit (a "work" in Open Library terms)
#[derive(Debug, Clone, Deserialize)]
pub struct OpenLibraryDoc {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Vec<String>,
    #[serde(default)]
    pub subject: Vec<String>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    #[serde(default)]
    pub ratings_average: Option<f64>,
    #[serde(default)]
    pub number_of_pages_median: Option<u32>,
    #[serde(default)]
    pub cover_i: Option<i64>,
}

impl From<OpenLibraryDoc> for Book {
    fn from(doc: OpenLibraryDoc) -> Self {
        let id = doc
            .key
            .map(|key| key.trim_start_matches("/works/").to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let cover_url = doc
            .cover_i
            .filter(|cover| *cover > 0)
            .map(|cover| format!("{}/{}-M.jpg", COVER_URL_BASE, cover));

        Book {
            id,
            title: doc.title.unwrap_or_default(),
            authors: doc.author_name,
            genres: doc.subject.into_iter().take(MAX_GENRES).collect(),
            rating: doc.ratings_average,
            first_publish_year: doc.first_publish_year,
            page_count: doc.number_of_pages_median,
            cover_url,
        }
    }
}
