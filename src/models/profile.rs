use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::WeightMap;

/// A user's reaction to a recommended book
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    Like,
    Dislike,
    /// Weaker positive signal: remembered as liked, weights untouched
    SaveForLater,
}

/// Learned taste of a single user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreferenceProfile {
    #[serde(default)]
    pub genre_weights: WeightMap,
    #[serde(default)]
    pub author_weights: WeightMap,
    #[serde(default)]
    pub liked_ids: HashSet<String>,
    #[serde(default)]
    pub disliked_ids: HashSet<String>,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl Default for PreferenceProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceProfile {
    /// Creates an empty profile
    pub fn new() -> Self {
        Self {
            genre_weights: WeightMap::new(),
            author_weights: WeightMap::new(),
            liked_ids: HashSet::new(),
            disliked_ids: HashSet::new(),
            last_updated: Utc::now(),
        }
    }

    /// Whether the user already reacted to this book
    pub fn has_seen(&self, book_id: &str) -> bool {
        self.liked_ids.contains(book_id) || self.disliked_ids.contains(book_id)
    }

    pub fn is_disliked(&self, book_id: &str) -> bool {
        self.disliked_ids.contains(book_id)
    }

    /// Marks a book as liked, taking it out of the disliked set
    pub fn mark_liked(&mut self, book_id: &str) {
        self.disliked_ids.remove(book_id);
        self.liked_ids.insert(book_id.to_string());
    }

    /// Marks a book as disliked, taking it out of the liked set
    pub fn mark_disliked(&mut self, book_id: &str) {
        self.liked_ids.remove(book_id);
        self.disliked_ids.insert(book_id.to_string());
    }

    /// Stamps the profile as modified now; the timestamp never moves backwards
    pub fn touch(&mut self) {
        self.last_updated = self.last_updated.max(Utc::now());
    }
}
