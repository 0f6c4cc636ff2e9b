use serde::{Deserialize, Serialize};

/// A book as returned by a book source
///
/// The engine only reads books; it never owns one beyond remembering its id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Unique identifier (Open Library work id, e.g. "OL45883W")
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Author names in source order
    #[serde(default)]
    pub authors: Vec<String>,
    /// Genre / subject tags in source order
    #[serde(default)]
    pub genres: Vec<String>,
    /// Average rating in [0, 5]
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

impl Book {
    /// Creates a book with only an id and a title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: Vec::new(),
            genres: Vec::new(),
            rating: None,
            first_publish_year: None,
            page_count: None,
            cover_url: None,
        }
    }

    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_first_publish_year(mut self, year: i32) -> Self {
        self.first_publish_year = Some(year);
        self
    }

    /// A book without a usable id cannot be tracked in a profile
    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }
}
