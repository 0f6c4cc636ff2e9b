//! Onboarding: turns an explicit genre selection plus a handful of liked
//! books into a starting profile.
//!
//! Genre weights are a fresh declaration on every call and replace whatever
//! was there. Author weights and liked ids are evidence and accumulate.

use crate::models::{Book, PreferenceProfile};
use crate::services::normalizer::normalize_profile;

/// Weight given to every explicitly selected genre
pub const SELECTED_GENRE_WEIGHT: f64 = 1.0;
/// Boost per liked book for each of its genres and authors
pub const LIKED_BOOK_BOOST: f64 = 0.5;

/// Applies the training rules without normalizing
pub fn apply_training(profile: &mut PreferenceProfile, selected_genres: &[String], liked_books: &[Book]) {
    profile.genre_weights.clear();
    for genre in selected_genres.iter().filter(|g| !g.trim().is_empty()) {
        profile.genre_weights.set(genre, SELECTED_GENRE_WEIGHT);
    }

    for book in liked_books.iter().filter(|b| b.has_id()) {
        profile.mark_liked(&book.id);

        for genre in &book.genres {
            profile.genre_weights.add(genre, LIKED_BOOK_BOOST);
        }
        for author in &book.authors {
            profile.author_weights.add(author, LIKED_BOOK_BOOST);
        }
    }

    profile.touch();
}

/// Trains `profile` from onboarding choices and normalizes both weight maps
pub fn train(profile: &mut PreferenceProfile, selected_genres: &[String], liked_books: &[Book]) {
    apply_training(profile, selected_genres, liked_books);
    normalize_profile(profile);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genres(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_selected_genres_are_lowercased() {
        let mut profile = PreferenceProfile::new();
        train(&mut profile, &genres(&["Fantasy", "Science Fiction"]), &[]);

        assert_eq!(profile.genre_weights.get("fantasy"), 1.0);
        assert_eq!(profile.genre_weights.get("science fiction"), 1.0);
        assert_eq!(
            profile.genre_weights.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["fantasy", "science fiction"]
        );
    }

    #[test]
    fn test_training_resets_genres() {
        let mut profile = PreferenceProfile::new();
        train(&mut profile, &genres(&["fantasy"]), &[]);
        train(&mut profile, &genres(&["mystery"]), &[]);

        assert_eq!(profile.genre_weights.len(), 1);
        assert_eq!(profile.genre_weights.get("mystery"), 1.0);
        assert!(!profile.genre_weights.contains_key("fantasy"));
    }

    #[test]
    fn test_liked_books_boost_and_normalize() {
        let mut profile = PreferenceProfile::new();
        let liked = vec![
            Book::new("OL1W", "A").with_genres(["Fantasy"]).with_authors(["Author X"]),
            Book::new("OL2W", "B").with_genres(["Fantasy", "Horror"]),
        ];
        train(&mut profile, &genres(&["mystery"]), &liked);

        // mystery 1.0, fantasy 1.0, horror 0.5 -> unchanged by normalization
        assert_eq!(profile.genre_weights.get("mystery"), 1.0);
        assert_eq!(profile.genre_weights.get("fantasy"), 1.0);
        assert_eq!(profile.genre_weights.get("horror"), 0.5);
        assert_eq!(profile.author_weights.get("author x"), 1.0);
        assert!(profile.liked_ids.contains("OL1W"));
        assert!(profile.liked_ids.contains("OL2W"));
    }

    #[test]
    fn test_selected_genre_boosted_by_liked_book() {
        let mut profile = PreferenceProfile::new();
        let liked = vec![Book::new("OL1W", "A").with_genres(["Fantasy"])];
        train(&mut profile, &genres(&["fantasy", "mystery"]), &liked);

        // fantasy 1.5, mystery 1.0 before normalization
        assert_eq!(profile.genre_weights.get("fantasy"), 1.0);
        assert!((profile.genre_weights.get("mystery") - 1.0 / 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_authors_accumulate_across_calls() {
        let book_a = Book::new("OL1W", "A").with_authors(["X"]);
        let book_b = Book::new("OL2W", "B").with_authors(["X"]);

        let mut single = PreferenceProfile::new();
        apply_training(&mut single, &[], &[book_a.clone()]);
        let single_raw = single.author_weights.get("x");

        let mut twice = PreferenceProfile::new();
        train(&mut twice, &[], &[book_a]);
        assert_eq!(twice.author_weights.get("x"), 1.0);
        apply_training(&mut twice, &[], &[book_b.clone()]);
        assert!(twice.author_weights.get("x") > single_raw);

        normalize_profile(&mut twice);
        assert_eq!(twice.author_weights.get("x"), 1.0);
        assert!(twice.liked_ids.contains("OL1W"));
        assert!(twice.liked_ids.contains("OL2W"));
    }

    #[test]
    fn test_liked_book_leaves_disliked_set() {
        let mut profile = PreferenceProfile::new();
        profile.mark_disliked("OL1W");
        train(&mut profile, &[], &[Book::new("OL1W", "A")]);
        assert!(profile.liked_ids.contains("OL1W"));
        assert!(profile.disliked_ids.is_empty());
    }

    #[test]
    fn test_books_without_id_and_blank_genres_are_skipped() {
        let mut profile = PreferenceProfile::new();
        let liked = vec![Book::new("", "Ghost").with_authors(["Nobody"])];
        train(&mut profile, &genres(&["", "  "]), &liked);

        assert!(profile.genre_weights.is_empty());
        assert!(profile.author_weights.is_empty());
        assert!(profile.liked_ids.is_empty());
    }
}
