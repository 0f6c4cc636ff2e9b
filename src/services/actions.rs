use crate::models::{Book, PreferenceProfile, UserAction};
use crate::services::normalizer::normalize_profile;

/// Boost per Like for each of the book's genres and authors
pub const LIKE_BOOST: f64 = 0.3;
/// Decrement per Dislike for each of the book's genres
pub const DISLIKE_DECAY: f64 = 0.1;

/// Applies one swipe reaction to `profile` and renormalizes it
///
/// A dislike lowers genre weights only; author weights are left alone so one
/// bad book does not bury an author. Books without an id are ignored.
/// Returns whether the profile changed.
pub fn apply_action(profile: &mut PreferenceProfile, book: &Book, action: UserAction) -> bool {
    if !book.has_id() {
        return false;
    }

    match action {
        UserAction::Like => {
            profile.mark_liked(&book.id);
            for genre in &book.genres {
                profile.genre_weights.add(genre, LIKE_BOOST);
            }
            for author in &book.authors {
                profile.author_weights.add(author, LIKE_BOOST);
            }
        }
        UserAction::Dislike => {
            profile.mark_disliked(&book.id);
            for genre in &book.genres {
                profile.genre_weights.add(genre, -DISLIKE_DECAY);
            }
        }
        UserAction::SaveForLater => {
            profile.mark_liked(&book.id);
        }
    }

    normalize_profile(profile);
    profile.touch();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trained_profile() -> PreferenceProfile {
        let mut profile = PreferenceProfile::new();
        profile.genre_weights.set("fantasy", 1.0);
        profile.genre_weights.set("horror", 0.5);
        profile.author_weights.set("x", 1.0);
        profile.author_weights.set("y", 0.5);
        profile
    }

    fn book() -> Book {
        Book::new("OL9W", "Swiped")
            .with_genres(["Horror"])
            .with_authors(["Y"])
    }

    #[test]
    fn test_like_boosts_genres_and_authors() {
        let mut profile = trained_profile();
        assert!(apply_action(&mut profile, &book(), UserAction::Like));

        assert!(profile.liked_ids.contains("OL9W"));
        assert!((profile.genre_weights.get("horror") - 0.8).abs() < 1e-12);
        assert!((profile.author_weights.get("y") - 0.8).abs() < 1e-12);
        assert_eq!(profile.genre_weights.get("fantasy"), 1.0);
    }

    #[test]
    fn test_like_renormalizes_new_maximum() {
        let mut profile = trained_profile();
        let favourite = Book::new("OL8W", "").with_genres(["fantasy"]);
        apply_action(&mut profile, &favourite, UserAction::Like);

        // fantasy 1.3 becomes the max
        assert_eq!(profile.genre_weights.get("fantasy"), 1.0);
        assert!((profile.genre_weights.get("horror") - 0.5 / 1.3).abs() < 1e-12);
    }

    #[test]
    fn test_dislike_lowers_genres_but_not_authors() {
        let mut profile = trained_profile();
        apply_action(&mut profile, &book(), UserAction::Dislike);

        assert!(profile.disliked_ids.contains("OL9W"));
        assert!((profile.genre_weights.get("horror") - 0.4).abs() < 1e-12);
        assert_eq!(profile.author_weights.get("y"), 0.5);
    }

    #[test]
    fn test_dislike_clamps_at_zero() {
        let mut profile = PreferenceProfile::new();
        profile.genre_weights.set("fantasy", 1.0);
        profile.genre_weights.set("horror", 0.05);
        apply_action(&mut profile, &book(), UserAction::Dislike);

        assert_eq!(profile.genre_weights.get("horror"), 0.0);
    }

    #[test]
    fn test_dislike_on_unknown_genre_records_zero() {
        let mut profile = PreferenceProfile::new();
        let book = Book::new("OL7W", "").with_genres(["Poetry"]);
        apply_action(&mut profile, &book, UserAction::Dislike);

        assert!(profile.genre_weights.contains_key("poetry"));
        assert_eq!(profile.genre_weights.get("poetry"), 0.0);
    }

    #[test]
    fn test_save_for_later_only_marks_liked() {
        let mut profile = trained_profile();
        let before = profile.clone();
        apply_action(&mut profile, &book(), UserAction::SaveForLater);

        assert!(profile.liked_ids.contains("OL9W"));
        assert_eq!(profile.genre_weights, before.genre_weights);
        assert_eq!(profile.author_weights, before.author_weights);
    }

    #[test]
    fn test_like_after_dislike_moves_between_sets() {
        let mut profile = trained_profile();
        apply_action(&mut profile, &book(), UserAction::Dislike);
        apply_action(&mut profile, &book(), UserAction::Like);

        assert!(profile.liked_ids.contains("OL9W"));
        assert!(!profile.disliked_ids.contains("OL9W"));
    }

    #[test]
    fn test_book_without_id_is_ignored() {
        let mut profile = trained_profile();
        let before = profile.clone();
        let anonymous = Book::new("", "").with_genres(["fantasy"]);

        assert!(!apply_action(&mut profile, &anonymous, UserAction::Like));
        assert_eq!(profile, before);
    }

    #[test]
    fn test_action_updates_timestamp() {
        let mut profile = trained_profile();
        let before = profile.last_updated;
        apply_action(&mut profile, &book(), UserAction::SaveForLater);
        assert!(profile.last_updated >= before);
    }
}
