use chrono::{Datelike, Utc};
use serde::Serialize;

use crate::models::{Book, PreferenceProfile};

const GENRE_WEIGHT: f64 = 0.4;
const AUTHOR_WEIGHT: f64 = 0.2;
const POPULARITY_WEIGHT: f64 = 0.2;
const NOVELTY_WEIGHT: f64 = 0.2;

/// Rating assumed for books nobody has rated yet (out of 5)
const DEFAULT_RATING: f64 = 3.5;
const MAX_RATING: f64 = 5.0;
/// Novelty used when the publish year is unknown
const NEUTRAL_NOVELTY: f64 = 0.5;
/// Years over which novelty decays linearly to zero
const NOVELTY_DECAY_YEARS: f64 = 50.0;
/// Multiplier applied to books the user disliked
const DISLIKE_PENALTY: f64 = 0.1;

/// Per-signal view of a book's score
///
/// Sub-scores are the raw signals before weighting; `score` is the weighted
/// sum with the dislike penalty applied.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ScoreBreakdown {
    pub genre: f64,
    pub author: f64,
    pub popularity: f64,
    pub novelty: f64,
    pub disliked: bool,
    pub score: f64,
}

/// Mean genre weight over the book's genres; 0 for a book without genres
fn genre_score(book: &Book, profile: &PreferenceProfile) -> f64 {
    if book.genres.is_empty() {
        return 0.0;
    }
    let total: f64 = book
        .genres
        .iter()
        .map(|genre| profile.genre_weights.get(genre))
        .sum();
    total / book.genres.len() as f64
}

/// Strongest author match; one favourite author outweighs several weak co-authors
fn author_score(book: &Book, profile: &PreferenceProfile) -> f64 {
    book.authors
        .iter()
        .map(|author| profile.author_weights.get(author))
        .reduce(f64::max)
        .unwrap_or(0.0)
}

fn popularity_score(book: &Book) -> f64 {
    book.rating.unwrap_or(DEFAULT_RATING) / MAX_RATING
}

fn novelty_score(book: &Book, current_year: i32) -> f64 {
    match book.first_publish_year {
        Some(year) => {
            let age = f64::from(current_year) - f64::from(year);
            (1.0 - age / NOVELTY_DECAY_YEARS).max(0.0)
        }
        None => NEUTRAL_NOVELTY,
    }
}

/// Scores `book` as of `current_year`, keeping every signal
pub fn explain_at(book: &Book, profile: &PreferenceProfile, current_year: i32) -> ScoreBreakdown {
    let genre = genre_score(book, profile);
    let author = author_score(book, profile);
    let popularity = popularity_score(book);
    let novelty = novelty_score(book, current_year);
    let disliked = profile.is_disliked(&book.id);

    let mut score = genre * GENRE_WEIGHT
        + author * AUTHOR_WEIGHT
        + popularity * POPULARITY_WEIGHT
        + novelty * NOVELTY_WEIGHT;

    // Disliked books sink but are not removed
    if disliked {
        score *= DISLIKE_PENALTY;
    }

    ScoreBreakdown {
        genre,
        author,
        popularity,
        novelty,
        disliked,
        score,
    }
}

pub fn explain(book: &Book, profile: &PreferenceProfile) -> ScoreBreakdown {
    explain_at(book, profile, Utc::now().year())
}

/// Relevance of `book` for the owner of `profile`
pub fn score(book: &Book, profile: &PreferenceProfile) -> f64 {
    explain(book, profile).score
}
